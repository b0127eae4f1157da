use chrono::NaiveDate;
use listing_match::config::MatchingConfig;
use listing_match::error::AppError;
use listing_match::matching::{
    Client, ClientId, ClientRepository, CsvPropertyCatalog, MatchVocabulary, Property,
    PropertyRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::demo::{seed_catalog, seed_clients};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryClientRepository {
    records: Arc<Mutex<BTreeMap<ClientId, Client>>>,
}

impl InMemoryClientRepository {
    pub(crate) fn from_clients(clients: Vec<Client>) -> Self {
        let repository = Self::default();
        for client in clients {
            repository.upsert(client);
        }
        repository
    }

    pub(crate) fn upsert(&self, client: Client) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(client.id.clone(), client);
    }
}

impl ClientRepository for InMemoryClientRepository {
    fn get_client(&self, id: &ClientId) -> Result<Client, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.0.clone()))
    }

    fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyRepository {
    listings: Arc<Mutex<Vec<Property>>>,
}

impl InMemoryPropertyRepository {
    pub(crate) fn from_properties(properties: Vec<Property>) -> Self {
        Self {
            listings: Arc::new(Mutex::new(properties)),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listings.lock().expect("catalog mutex poisoned").len()
    }
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn get_all_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        let guard = self.listings.lock().expect("catalog mutex poisoned");
        Ok(guard.clone())
    }
}

/// Vocabulary, clients and catalog resolved from configuration, seeded when unset.
pub(crate) struct MatchingSources {
    pub(crate) vocabulary: MatchVocabulary,
    pub(crate) clients: InMemoryClientRepository,
    pub(crate) properties: InMemoryPropertyRepository,
}

impl MatchingSources {
    pub(crate) fn load(config: &MatchingConfig) -> Result<Self, AppError> {
        let vocabulary = config.vocabulary()?;

        let clients = match &config.clients_path {
            Some(path) => load_clients(path)?,
            None => {
                info!("MATCH_CLIENTS_PATH unset; using seeded demo clients");
                seed_clients()
            }
        };
        let properties = match &config.catalog_path {
            Some(path) => CsvPropertyCatalog::from_path(path)?.into_properties(),
            None => {
                info!("MATCH_CATALOG_PATH unset; using seeded demo catalog");
                seed_catalog()
            }
        };

        Ok(Self {
            vocabulary,
            clients: InMemoryClientRepository::from_clients(clients),
            properties: InMemoryPropertyRepository::from_properties(properties),
        })
    }
}

/// Reads a JSON array of client profiles.
pub(crate) fn load_clients(path: &Path) -> Result<Vec<Client>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let clients = serde_json::from_str(&raw)?;
    Ok(clients)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
