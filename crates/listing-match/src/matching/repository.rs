use super::domain::{Client, ClientId, Property};

/// Read access to client profiles.
pub trait ClientRepository: Send + Sync {
    fn get_client(&self, id: &ClientId) -> Result<Client, RepositoryError>;
    fn list_clients(&self) -> Result<Vec<Client>, RepositoryError>;
}

/// Read access to the listing catalog.
pub trait PropertyRepository: Send + Sync {
    fn get_all_properties(&self) -> Result<Vec<Property>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
