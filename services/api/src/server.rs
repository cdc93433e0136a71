use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemorySessionRepository};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use taxonomy_review::catalog::ImportMode;
use taxonomy_review::config::AppConfig;
use taxonomy_review::error::AppError;
use taxonomy_review::review::ReviewService;
use taxonomy_review::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(catalog) = args.catalog.take() {
        config.catalog.path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.catalog.path.as_deref(), ImportMode::Lenient)?;
    let sessions = Arc::new(InMemorySessionRepository::default());
    let review_service = Arc::new(ReviewService::new(Arc::new(catalog), sessions));

    let app = with_review_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "taxonomy review service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
