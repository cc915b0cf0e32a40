use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lead_pages::workflows::catalog::CatalogSource;
use lead_pages::workflows::publishing::{page_router, PagePublishingService, PageRepository};
use lead_pages::workflows::wizard::{PageType, WizardSchema};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// One row of the wizard picker.
#[derive(Debug, Serialize)]
pub(crate) struct WizardSummary {
    pub(crate) page_type: PageType,
    pub(crate) label: &'static str,
    pub(crate) title: &'static str,
    pub(crate) accent_color: &'static str,
    pub(crate) steps: usize,
    pub(crate) has_schedule: bool,
}

pub(crate) fn with_page_routes<R>(
    service: Arc<PagePublishingService<R>>,
    catalog: Arc<dyn CatalogSource>,
) -> axum::Router
where
    R: PageRepository + 'static,
{
    page_router(service, catalog)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/wizards", axum::routing::get(wizard_index))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn wizard_index() -> Json<Vec<WizardSummary>> {
    let summaries = PageType::ordered()
        .into_iter()
        .map(|page_type| {
            let schema = WizardSchema::for_page(page_type);
            WizardSummary {
                page_type,
                label: page_type.label(),
                title: schema.title,
                accent_color: schema.accent_color,
                steps: schema.total_steps(),
                has_schedule: page_type.has_schedule(),
            }
        })
        .collect();
    Json(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryPageRepository;
    use axum::body::Body;
    use axum::http::Request;
    use lead_pages::workflows::catalog::InMemoryCatalog;
    use lead_pages::workflows::publishing::PublishingSettings;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn router() -> axum::Router {
        let service = Arc::new(PagePublishingService::new(
            Arc::new(InMemoryPageRepository::default()),
            PublishingSettings {
                base_url: "http://127.0.0.1:3000/p".to_string(),
                submit_token: None,
            },
        ));
        let catalog: Arc<dyn CatalogSource> = Arc::new(InMemoryCatalog::demo());
        with_page_routes(service, catalog).layer(Extension(app_state(true)))
    }

    #[tokio::test]
    async fn wizard_index_lists_every_page_type() {
        let Json(summaries) = wizard_index().await;

        assert_eq!(summaries.len(), 6);
        let calculator = summaries
            .iter()
            .find(|summary| summary.page_type == PageType::MortgageCalculator)
            .expect("calculator listed");
        assert_eq!(calculator.steps, 3);
        assert!(!calculator.has_schedule);
        assert!(summaries
            .iter()
            .filter(|summary| summary.has_schedule)
            .all(|summary| matches!(
                summary.page_type,
                PageType::OpenHouse | PageType::SpecialEvent
            )));
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn operational_and_page_routes_share_one_router() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router()
            .oneshot(
                Request::get("/api/v1/catalog/calendar")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router()
            .oneshot(
                Request::get("/api/v1/wizards/open_house/schema")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
