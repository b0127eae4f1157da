use super::filter::{apply_filter_with, PropertyFilter};
use super::recommender::Recommendation;
use super::vocabulary::MatchVocabulary;

/// Ranked list plus the filter currently applied to it.
///
/// Every change to either side recomputes the visible list, so callers can rebuild their
/// display from [`RecommendationView::visible`] after each edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationView {
    ranked: Vec<Recommendation>,
    filter: PropertyFilter,
    visible: Vec<Recommendation>,
    vocabulary: MatchVocabulary,
}

impl RecommendationView {
    /// View resolving filter labels through the standard vocabulary.
    pub fn new(ranked: Vec<Recommendation>) -> Self {
        Self::with_vocabulary(ranked, MatchVocabulary::standard())
    }

    pub fn with_vocabulary(ranked: Vec<Recommendation>, vocabulary: MatchVocabulary) -> Self {
        let visible = ranked.clone();
        Self {
            ranked,
            filter: PropertyFilter::default(),
            visible,
            vocabulary,
        }
    }

    pub fn ranked(&self) -> &[Recommendation] {
        &self.ranked
    }

    pub fn filter(&self) -> &PropertyFilter {
        &self.filter
    }

    pub fn visible(&self) -> &[Recommendation] {
        &self.visible
    }

    pub fn active_filters_count(&self) -> usize {
        self.filter.active_filters_count()
    }

    /// Swap in a freshly ranked list, keeping the current filter.
    pub fn replace_ranked(&mut self, ranked: Vec<Recommendation>) {
        self.ranked = ranked;
        self.refresh();
    }

    pub fn update_filter(&mut self, filter: PropertyFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.update_filter(PropertyFilter::default());
    }

    fn refresh(&mut self) {
        self.visible = apply_filter_with(&self.ranked, &self.filter, &self.vocabulary);
    }
}
