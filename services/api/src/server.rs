use crate::cli::ServeArgs;
use crate::infra::{AppState, MatchingSources};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listing_match::config::AppConfig;
use listing_match::error::AppError;
use listing_match::matching::MatchingService;
use listing_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sources = MatchingSources::load(&config.matching)?;
    let catalog_size = sources.properties.len();
    let matching_service = Arc::new(MatchingService::new(
        Arc::new(sources.clients),
        Arc::new(sources.properties),
        sources.vocabulary,
    ));

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, catalog_size, "listing match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
