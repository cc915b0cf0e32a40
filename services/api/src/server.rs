use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryPageRepository};
use crate::routes::with_page_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_pages::config::AppConfig;
use lead_pages::error::AppError;
use lead_pages::telemetry;
use lead_pages::workflows::catalog::CatalogSource;
use lead_pages::workflows::publishing::PagePublishingService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.pages.submit_token.is_none() {
        warn!("PAGES_SUBMIT_TOKEN is not set; submissions are accepted without a token");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog: Arc<dyn CatalogSource> = Arc::new(load_catalog(&config.pages)?);
    let repository = Arc::new(InMemoryPageRepository::default());
    let service = Arc::new(PagePublishingService::new(
        repository,
        config.pages.publishing_settings(),
    ));

    let app = with_page_routes(service, catalog)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        base_url = %config.pages.base_url,
        "landing page service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
