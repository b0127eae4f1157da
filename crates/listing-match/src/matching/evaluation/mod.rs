mod matchers;
mod policy;
mod weights;

pub use matchers::{
    range_credit, MatchResult, MatcherKind, AREA_TOLERANCE_RATIO, BUDGET_TOLERANCE_RATIO,
    DISTRICT_CONTAINS_CREDIT, MISSING_ATTRIBUTE_CREDIT, MOVE_IN_TOLERANCE_DAYS, ROOMS_TOLERANCE,
    STAY_TOLERANCE_DAYS,
};
pub use policy::{HardFailPolicy, HARD_FAIL_POLICY, HARD_FAIL_SCORE, NEUTRAL_SCORE};
pub use weights::{matchers_for, weight, LONG_TERM_MATCHERS, SHORT_TERM_MATCHERS};

use super::domain::{Client, Property, PropertyId};
use super::vocabulary::MatchVocabulary;
use matchers::MatchContext;
use serde::{Deserialize, Serialize};

/// Stateless scorer applying the weighted matcher tables to a client/listing pair.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    vocabulary: MatchVocabulary,
}

impl ScoringEngine {
    pub fn new(vocabulary: MatchVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &MatchVocabulary {
        &self.vocabulary
    }

    /// Score with the full per-dimension breakdown.
    pub fn evaluate(&self, client: &Client, property: &Property) -> MatchOutcome {
        let ctx = MatchContext {
            client,
            property,
            vocabulary: &self.vocabulary,
        };

        let mut components = Vec::new();
        let mut hard_failures = Vec::new();
        for kind in matchers_for(client.rental_type) {
            let result = kind.evaluate(&ctx);
            if !result.applicable {
                continue;
            }
            if result.hard_fail {
                hard_failures.push(*kind);
            }
            components.push(ScoreComponent {
                matcher: *kind,
                weight: weight(*kind),
                partial_score: result.partial_score,
                hard_fail: result.hard_fail,
                notes: result.notes,
            });
        }

        let score = policy::combine(&components, !hard_failures.is_empty());

        MatchOutcome {
            property_id: property.id.clone(),
            score,
            hard_failures,
            components,
        }
    }

    pub fn score(&self, client: &Client, property: &Property) -> f64 {
        self.evaluate(client, property).score
    }
}

/// Contribution of one applicable dimension, kept for audits and explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub matcher: MatcherKind,
    pub weight: u32,
    pub partial_score: f64,
    pub hard_fail: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub property_id: PropertyId,
    pub score: f64,
    pub hard_failures: Vec<MatcherKind>,
    pub components: Vec<ScoreComponent>,
}

impl MatchOutcome {
    pub fn is_disqualified(&self) -> bool {
        !self.hard_failures.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_disqualified() {
            let reasons: Vec<&str> = self
                .components
                .iter()
                .filter(|component| component.hard_fail)
                .map(|component| component.notes.as_str())
                .collect();
            format!("disqualified: {}", reasons.join("; "))
        } else if self.components.is_empty() {
            "no stated preferences".to_string()
        } else {
            format!(
                "{:.0}% match across {} criteria",
                self.score * 100.0,
                self.components.len()
            )
        }
    }
}
