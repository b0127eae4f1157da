use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::ClientId;
use super::filter::PropertyFilter;
use super::recommender::Recommendation;
use super::repository::{ClientRepository, PropertyRepository, RepositoryError};
use super::service::{MatchingService, MatchingServiceError};

/// Response body shared by the recommendation endpoints.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub client_id: String,
    pub active_filters: usize,
    pub count: usize,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationsResponse {
    pub fn new(
        client_id: ClientId,
        filter: &PropertyFilter,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            client_id: client_id.0,
            active_filters: filter.active_filters_count(),
            count: recommendations.len(),
            recommendations,
        }
    }
}

/// Router builder exposing ranked and filtered recommendations per client.
pub fn recommendation_router<C, P>(service: Arc<MatchingService<C, P>>) -> Router
where
    C: ClientRepository + 'static,
    P: PropertyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/clients/:client_id/recommendations",
            get(recommendations_handler::<C, P>),
        )
        .route(
            "/api/v1/clients/:client_id/recommendations/search",
            post(search_handler::<C, P>),
        )
        .with_state(service)
}

pub(crate) async fn recommendations_handler<C, P>(
    State(service): State<Arc<MatchingService<C, P>>>,
    Path(client_id): Path<String>,
) -> Response
where
    C: ClientRepository + 'static,
    P: PropertyRepository + 'static,
{
    let id = ClientId(client_id);
    let filter = PropertyFilter::default();
    match service.recommend_for_client(&id) {
        Ok(ranked) => {
            let body = RecommendationsResponse::new(id, &filter, ranked);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(&id, error),
    }
}

pub(crate) async fn search_handler<C, P>(
    State(service): State<Arc<MatchingService<C, P>>>,
    Path(client_id): Path<String>,
    axum::Json(filter): axum::Json<PropertyFilter>,
) -> Response
where
    C: ClientRepository + 'static,
    P: PropertyRepository + 'static,
{
    let id = ClientId(client_id);
    match service.search(&id, &filter) {
        Ok(visible) => {
            let body = RecommendationsResponse::new(id, &filter, visible);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(&id, error),
    }
}

fn error_response(id: &ClientId, error: MatchingServiceError) -> Response {
    let status = match &error {
        MatchingServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        MatchingServiceError::InvalidClient(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MatchingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({
        "client_id": id.0,
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
