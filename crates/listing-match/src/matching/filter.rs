//! Post-ranking narrowing of a recommendation list.
//!
//! Filtering never re-sorts and never looks at scores: disqualified listings that the
//! recommender kept stay visible unless a filter predicate removes them.
//!
//! Property types and districts are compared through the same [`MatchVocabulary`] aliases the
//! scoring engine uses, so a filter for `apartment` keeps listings typed `Квартира`. The search
//! query is free text and is only normalized.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::Property;
use super::recommender::Recommendation;
use super::vocabulary::{normalize_label, MatchVocabulary, OptionKind};

/// Optional constraints; the default value passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyFilter {
    pub property_types: BTreeSet<String>,
    pub min_rooms: Option<u32>,
    pub max_rooms: Option<u32>,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    pub districts: BTreeSet<String>,
    pub search_query: String,
}

impl PropertyFilter {
    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_types.insert(property_type.into());
        self
    }

    pub fn with_rooms(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_rooms = min;
        self.max_rooms = max;
        self
    }

    pub fn with_price(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.districts.insert(district.into());
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Number of active constraint groups. A room or price range counts once, whichever of
    /// its bounds are set.
    pub fn active_filters_count(&self) -> usize {
        [
            !self.property_types.is_empty(),
            self.min_rooms.is_some() || self.max_rooms.is_some(),
            self.min_price.is_some() || self.max_price.is_some(),
            !self.districts.is_empty(),
            !self.search_query.trim().is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filters_count() > 0
    }

    pub fn matches(&self, property: &Property, vocabulary: &MatchVocabulary) -> bool {
        CompiledFilter::new(self, vocabulary).matches(property)
    }
}

/// Filter with labels pre-resolved so a whole list is checked without re-folding them.
struct CompiledFilter<'a> {
    filter: &'a PropertyFilter,
    vocabulary: &'a MatchVocabulary,
    property_types: BTreeSet<String>,
    districts: BTreeSet<String>,
    query: String,
}

impl<'a> CompiledFilter<'a> {
    fn new(filter: &'a PropertyFilter, vocabulary: &'a MatchVocabulary) -> Self {
        Self {
            filter,
            vocabulary,
            property_types: vocabulary
                .canonical_set(OptionKind::PropertyType, &filter.property_types),
            districts: vocabulary.canonical_set(OptionKind::District, &filter.districts),
            query: normalize_label(&filter.search_query),
        }
    }

    fn matches(&self, property: &Property) -> bool {
        self.matches_type(property)
            && self.matches_rooms(property)
            && self.matches_price(property)
            && self.matches_district(property)
            && self.matches_query(property)
    }

    fn matches_type(&self, property: &Property) -> bool {
        self.property_types.is_empty()
            || self.property_types.contains(
                &self
                    .vocabulary
                    .canonical(OptionKind::PropertyType, &property.property_type),
            )
    }

    fn matches_rooms(&self, property: &Property) -> bool {
        within(property.rooms_count, self.filter.min_rooms, self.filter.max_rooms)
    }

    fn matches_price(&self, property: &Property) -> bool {
        within(
            property.listed_price(),
            self.filter.min_price,
            self.filter.max_price,
        )
    }

    fn matches_district(&self, property: &Property) -> bool {
        self.districts.is_empty()
            || self
                .districts
                .contains(&self.vocabulary.canonical(OptionKind::District, &property.district))
    }

    fn matches_query(&self, property: &Property) -> bool {
        if self.query.is_empty() {
            return true;
        }

        [
            &property.address,
            &property.description,
            &property.district,
            &property.property_type,
        ]
        .into_iter()
        .any(|field| normalize_label(field).contains(&self.query))
    }
}

/// Inclusive bounds check; an unknown value fails whenever either bound is set.
fn within(value: Option<u32>, min: Option<u32>, max: Option<u32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Order-preserving subsequence of `recommendations` passing every active constraint, with
/// labels resolved through the standard vocabulary.
pub fn apply_filter(
    recommendations: &[Recommendation],
    filter: &PropertyFilter,
) -> Vec<Recommendation> {
    if !filter.has_active_filters() {
        return recommendations.to_vec();
    }
    apply_filter_with(recommendations, filter, &MatchVocabulary::standard())
}

/// Like [`apply_filter`], resolving labels through `vocabulary`.
pub fn apply_filter_with(
    recommendations: &[Recommendation],
    filter: &PropertyFilter,
    vocabulary: &MatchVocabulary,
) -> Vec<Recommendation> {
    if !filter.has_active_filters() {
        return recommendations.to_vec();
    }

    let compiled = CompiledFilter::new(filter, vocabulary);
    recommendations
        .iter()
        .filter(|recommendation| compiled.matches(&recommendation.property))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_inactive() {
        let filter = PropertyFilter::default();
        assert_eq!(filter.active_filters_count(), 0);
        assert!(!filter.has_active_filters());
    }

    #[test]
    fn ranges_count_once() {
        let filter = PropertyFilter::default()
            .with_rooms(Some(1), Some(3))
            .with_price(None, Some(60_000));
        assert_eq!(filter.active_filters_count(), 2);
    }

    #[test]
    fn blank_search_query_is_inactive() {
        let filter = PropertyFilter::default().with_search("   ");
        assert!(!filter.has_active_filters());
    }

    #[test]
    fn every_group_counts() {
        let filter = PropertyFilter::default()
            .with_property_type("Квартира")
            .with_rooms(Some(2), None)
            .with_price(Some(10), None)
            .with_district("Центральный")
            .with_search("парк");
        assert_eq!(filter.active_filters_count(), 5);
    }

    #[test]
    fn within_treats_unknown_values_as_failing() {
        assert!(within(None, None, None));
        assert!(!within(None, Some(1), None));
        assert!(within(Some(5), Some(5), Some(5)));
        assert!(!within(Some(6), None, Some(5)));
        assert!(!within(Some(4), Some(5), None));
    }
}
