use std::sync::Arc;

use tracing::debug;

use super::domain::{Client, ClientId, Property};
use super::evaluation::{MatchOutcome, ScoringEngine};
use super::filter::{apply_filter_with, PropertyFilter};
use super::recommender::{InvalidClientError, Recommendation, Recommender};
use super::repository::{ClientRepository, PropertyRepository, RepositoryError};
use super::view::RecommendationView;
use super::vocabulary::{MatchVocabulary, OptionKind};

/// Service composing the repositories with the recommender.
pub struct MatchingService<C, P> {
    clients: Arc<C>,
    properties: Arc<P>,
    recommender: Arc<Recommender>,
}

impl<C, P> MatchingService<C, P>
where
    C: ClientRepository + 'static,
    P: PropertyRepository + 'static,
{
    pub fn new(clients: Arc<C>, properties: Arc<P>, vocabulary: MatchVocabulary) -> Self {
        let recommender = Arc::new(Recommender::new(ScoringEngine::new(vocabulary)));
        Self {
            clients,
            properties,
            recommender,
        }
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn vocabulary(&self) -> &MatchVocabulary {
        self.recommender.engine().vocabulary()
    }

    /// Rank the whole catalog for one stored client.
    pub fn recommend_for_client(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<Recommendation>, MatchingServiceError> {
        let client = self.clients.get_client(client_id)?;
        let catalog = self.properties.get_all_properties()?;
        self.rank(&client, &catalog)
    }

    /// Rank, then narrow with `filter`.
    pub fn search(
        &self,
        client_id: &ClientId,
        filter: &PropertyFilter,
    ) -> Result<Vec<Recommendation>, MatchingServiceError> {
        let ranked = self.recommend_for_client(client_id)?;
        Ok(apply_filter_with(&ranked, filter, self.vocabulary()))
    }

    pub fn view_for_client(
        &self,
        client_id: &ClientId,
    ) -> Result<RecommendationView, MatchingServiceError> {
        let ranked = self.recommend_for_client(client_id)?;
        Ok(RecommendationView::with_vocabulary(
            ranked,
            self.vocabulary().clone(),
        ))
    }

    /// Per-dimension breakdown for a single listing.
    pub fn explain(
        &self,
        client_id: &ClientId,
        property: &Property,
    ) -> Result<MatchOutcome, MatchingServiceError> {
        let client = self.clients.get_client(client_id)?;
        Ok(self.recommender.engine().evaluate(&client, property))
    }

    /// Rank the catalog for several clients. A missing or invalid client only affects its own
    /// entry; a catalog failure aborts the batch.
    pub fn recommend_batch(
        &self,
        client_ids: &[ClientId],
    ) -> Result<Vec<ClientRecommendations>, MatchingServiceError> {
        let catalog = self.properties.get_all_properties()?;

        let results = client_ids
            .iter()
            .map(|client_id| {
                let outcome = self
                    .clients
                    .get_client(client_id)
                    .map_err(MatchingServiceError::from)
                    .and_then(|client| self.rank(&client, &catalog));
                ClientRecommendations {
                    client_id: client_id.clone(),
                    outcome,
                }
            })
            .collect();
        Ok(results)
    }

    fn rank(
        &self,
        client: &Client,
        catalog: &[Property],
    ) -> Result<Vec<Recommendation>, MatchingServiceError> {
        let unknown = unrecognized_labels(self.recommender.engine().vocabulary(), client);
        if !unknown.is_empty() {
            debug!(client_id = %client.id.0, ?unknown, "client uses labels outside the vocabulary");
        }

        let ranked = self.recommender.recommend(client, catalog)?;
        if ranked.is_empty() {
            debug!(client_id = %client.id.0, "no listings to rank");
        }
        Ok(ranked)
    }
}

/// Result slot for one client of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecommendations {
    pub client_id: ClientId,
    pub outcome: Result<Vec<Recommendation>, MatchingServiceError>,
}

/// Error raised by the matching service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    InvalidClient(#[from] InvalidClientError),
}

fn unrecognized_labels(vocabulary: &MatchVocabulary, client: &Client) -> Vec<(OptionKind, String)> {
    let singles = [
        (OptionKind::District, Some(client.preferred_district.as_str())),
        (
            OptionKind::PropertyType,
            Some(client.desired_property_type.as_str()),
        ),
        (OptionKind::Parking, client.preferred_parking.as_deref()),
        (OptionKind::Bathroom, client.preferred_bathroom.as_deref()),
        (OptionKind::Heating, client.preferred_heating.as_deref()),
    ];
    let sets = [
        (OptionKind::Amenity, &client.preferred_amenities),
        (OptionKind::View, &client.preferred_views),
        (OptionKind::NearbyObject, &client.preferred_nearby_objects),
        (OptionKind::PetType, &client.pet_types),
    ];

    let mut unknown = Vec::new();
    for (kind, label) in singles {
        if let Some(label) = label.filter(|label| !label.trim().is_empty()) {
            if !vocabulary.is_known(kind, label) {
                unknown.push((kind, label.to_string()));
            }
        }
    }
    for (kind, labels) in sets {
        for label in labels {
            if !label.trim().is_empty() && !vocabulary.is_known(kind, label) {
                unknown.push((kind, label.clone()));
            }
        }
    }
    unknown
}
