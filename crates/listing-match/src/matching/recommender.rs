use std::cmp::Ordering;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Client, ClientId, Property, RentalType};
use super::evaluation::{MatcherKind, ScoringEngine, HARD_FAIL_POLICY};

/// A listing paired with its compatibility score for one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub property: Property,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hard_failures: Vec<MatcherKind>,
}

impl Recommendation {
    pub fn is_disqualified(&self) -> bool {
        !self.hard_failures.is_empty()
    }
}

/// Client records that lack the minimum signal needed to score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidClientError {
    #[error("client {} has no {} budget", .client_id.0, .rental_type.label())]
    MissingBudget {
        client_id: ClientId,
        rental_type: RentalType,
    },
    #[error("client {} has minimum budget {min} above maximum {max}", .client_id.0)]
    InvertedBudget { client_id: ClientId, min: u32, max: u32 },
    #[error("client {} has check-out {check_out} not after check-in {check_in}", .client_id.0)]
    InvalidStay {
        client_id: ClientId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

/// Reject clients whose active rental type carries no usable budget or stay window.
pub fn validate_client(client: &Client) -> Result<(), InvalidClientError> {
    let budget = client.budget();
    if budget.is_unset() {
        return Err(InvalidClientError::MissingBudget {
            client_id: client.id.clone(),
            rental_type: client.rental_type,
        });
    }

    if let (Some(min), Some(max)) = (budget.min, budget.max) {
        if min > max {
            return Err(InvalidClientError::InvertedBudget {
                client_id: client.id.clone(),
                min,
                max,
            });
        }
    }

    if client.rental_type == RentalType::ShortTerm {
        if let (Some(check_in), Some(check_out)) =
            (client.short_term.check_in, client.short_term.check_out)
        {
            if check_out <= check_in {
                return Err(InvalidClientError::InvalidStay {
                    client_id: client.id.clone(),
                    check_in,
                    check_out,
                });
            }
        }
    }

    Ok(())
}

/// Ranking order: score descending, then most recently updated, then id ascending.
pub fn compare_ranked(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.property.updated_at.cmp(&a.property.updated_at))
        .then_with(|| a.property.id.cmp(&b.property.id))
}

/// Scores a whole catalog for one client and ranks the result.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    engine: ScoringEngine,
}

impl Recommender {
    pub fn new(engine: ScoringEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn recommend(
        &self,
        client: &Client,
        catalog: &[Property],
    ) -> Result<Vec<Recommendation>, InvalidClientError> {
        self.checked(client)?;

        let scored = catalog
            .iter()
            .map(|property| self.recommendation(client, property))
            .collect();
        Ok(self.ranked(client, scored, catalog.len()))
    }

    /// Same contract as [`Recommender::recommend`], scoring listings on the rayon pool.
    pub fn recommend_parallel(
        &self,
        client: &Client,
        catalog: &[Property],
    ) -> Result<Vec<Recommendation>, InvalidClientError> {
        self.checked(client)?;

        let scored = catalog
            .par_iter()
            .map(|property| self.recommendation(client, property))
            .collect();
        Ok(self.ranked(client, scored, catalog.len()))
    }

    fn checked(&self, client: &Client) -> Result<(), InvalidClientError> {
        validate_client(client).map_err(|err| {
            warn!(client_id = %client.id.0, error = %err, "client cannot be scored");
            err
        })
    }

    fn recommendation(&self, client: &Client, property: &Property) -> Recommendation {
        let outcome = self.engine.evaluate(client, property);
        Recommendation {
            property: property.clone(),
            score: outcome.score,
            hard_failures: outcome.hard_failures,
        }
    }

    fn ranked(
        &self,
        client: &Client,
        mut scored: Vec<Recommendation>,
        catalog_size: usize,
    ) -> Vec<Recommendation> {
        if !HARD_FAIL_POLICY.keeps_disqualified() {
            scored.retain(|recommendation| !recommendation.is_disqualified());
        }
        scored.sort_by(compare_ranked);

        debug!(
            client_id = %client.id.0,
            rental_type = client.rental_type.label(),
            catalog_size,
            ranked = scored.len(),
            "scored catalog"
        );
        scored
    }
}
