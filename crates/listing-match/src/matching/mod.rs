//! Client-to-listing matching for a rental agency.
//!
//! A client profile is scored against every listing in the catalog by a weighted set of
//! per-dimension matchers selected by rental type. The ranked list can then be narrowed with a
//! [`PropertyFilter`] without disturbing its order.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod filter;
pub mod recommender;
pub mod repository;
pub mod router;
pub mod service;
pub mod view;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogImportError, CsvPropertyCatalog};
pub use domain::{
    BudgetBounds, Client, ClientId, LongTermPreferences, Property, PropertyId, PropertyStatus,
    RentalType, SeasonalPrice, ShortTermPreferences,
};
pub use evaluation::{
    HardFailPolicy, MatchOutcome, MatcherKind, ScoreComponent, ScoringEngine, HARD_FAIL_POLICY,
};
pub use filter::{apply_filter, apply_filter_with, PropertyFilter};
pub use recommender::{
    compare_ranked, validate_client, InvalidClientError, Recommendation, Recommender,
};
pub use repository::{ClientRepository, PropertyRepository, RepositoryError};
pub use router::{recommendation_router, RecommendationsResponse};
pub use service::{ClientRecommendations, MatchingService, MatchingServiceError};
pub use view::RecommendationView;
pub use vocabulary::{normalize_label, MatchVocabulary, OptionKind, OptionList, VocabularyError};
