use serde::{Deserialize, Serialize};

use super::ScoreComponent;

/// What happens to a listing after a disqualifying mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardFailPolicy {
    /// Keep the listing in the ranking with its score forced to [`HARD_FAIL_SCORE`].
    SuppressScore,
    /// Drop the listing from the ranking.
    Exclude,
}

impl HardFailPolicy {
    pub const fn keeps_disqualified(self) -> bool {
        matches!(self, HardFailPolicy::SuppressScore)
    }
}

/// Policy shared by the recommender and the filter layer.
pub const HARD_FAIL_POLICY: HardFailPolicy = HardFailPolicy::SuppressScore;
pub const HARD_FAIL_SCORE: f64 = 0.0;
/// Score when the client expressed no applicable preference at all.
pub const NEUTRAL_SCORE: f64 = 0.5;

pub(crate) fn combine(components: &[ScoreComponent], disqualified: bool) -> f64 {
    if disqualified {
        return HARD_FAIL_SCORE;
    }

    let total_weight: u32 = components.iter().map(|component| component.weight).sum();
    if total_weight == 0 {
        return NEUTRAL_SCORE;
    }

    let weighted: f64 = components
        .iter()
        .map(|component| f64::from(component.weight) * component.partial_score)
        .sum();
    (weighted / f64::from(total_weight)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::evaluation::MatcherKind;

    fn component(matcher: MatcherKind, weight: u32, partial_score: f64) -> ScoreComponent {
        ScoreComponent {
            matcher,
            weight,
            partial_score,
            hard_fail: false,
            notes: String::new(),
        }
    }

    #[test]
    fn empty_components_score_neutral() {
        assert_eq!(combine(&[], false), NEUTRAL_SCORE);
    }

    #[test]
    fn disqualification_forces_floor() {
        let components = vec![component(MatcherKind::District, 4, 1.0)];
        assert_eq!(combine(&components, true), HARD_FAIL_SCORE);
    }

    #[test]
    fn weighted_mean_uses_integer_weights() {
        let components = vec![
            component(MatcherKind::LongTermBudget, 5, 1.0),
            component(MatcherKind::District, 4, 0.0),
            component(MatcherKind::Amenities, 1, 0.5),
        ];
        let score = combine(&components, false);
        assert!((score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn current_policy_keeps_disqualified_listings() {
        assert!(HARD_FAIL_POLICY.keeps_disqualified());
        assert!(!HardFailPolicy::Exclude.keeps_disqualified());
    }
}
