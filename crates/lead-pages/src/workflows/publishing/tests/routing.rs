use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::catalog::{CatalogSource, InMemoryCatalog};
use crate::workflows::publishing::router::{identity_from_headers, submit_handler};
use crate::workflows::publishing::{
    PagePublishingService, PublishingState, ROLES_HEADER, TOKEN_HEADER, USER_HEADER,
};
use crate::workflows::wizard::{fields, SubmissionPayload};

fn submit_request(slug: &str, payload: &SubmissionPayload, token: &str) -> Request<Body> {
    Request::post(format!("/api/v1/wizards/{slug}/submit"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(TOKEN_HEADER, token)
        .header(USER_HEADER, "user-42")
        .header(ROLES_HEADER, "subscriber, loan_officer")
        .body(Body::from(serde_json::to_vec(payload).expect("payload json")))
        .expect("request")
}

#[test]
fn identity_headers_split_roles_on_commas() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_HEADER, HeaderValue::from_static(" user-42 "));
    headers.insert(ROLES_HEADER, HeaderValue::from_static("subscriber, realtor,,"));

    let identity = identity_from_headers(&headers);
    assert_eq!(identity.user_id, "user-42");
    assert_eq!(identity.roles.len(), 2);
    assert!(identity.roles.contains("realtor"));
}

#[tokio::test]
async fn submit_route_returns_success_envelope() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(submit_request("open_house", &open_house_payload(), TOKEN))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_str().expect("id");
    assert!(body["data"]["url"]
        .as_str()
        .expect("url")
        .ends_with(&format!("/open_house/{id}")));
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn submit_route_reports_failures_in_the_envelope() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(submit_request("open_house", &open_house_payload(), "stale"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["data"]["message"],
        "invalid or missing submission token"
    );
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn submit_route_rejects_payload_for_another_wizard() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(submit_request("special-event", &open_house_payload(), TOKEN))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn undecodable_submissions_use_the_failure_envelope() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    for (content_type, body) in [
        ("application/json", r#"{"page_type":"webinar"}"#),
        ("application/json", "{not json"),
        ("text/plain", "{}"),
    ] {
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/wizards/open_house/submit")
                    .header(header::CONTENT_TYPE, content_type)
                    .header(TOKEN_HEADER, TOKEN)
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert!(response.status().is_client_error(), "{body}");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let envelope = read_json_body(response).await;
        assert_eq!(envelope["success"], false);
        assert!(envelope["data"]["message"]
            .as_str()
            .is_some_and(|message| !message.is_empty()));
    }
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn submit_route_rejects_embed_code_output() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(submit_request(
            "mortgage_calculator",
            &calculator_payload(fields::OUTPUT_EMBED_CODE),
            TOKEN,
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(PagePublishingService::new(
        Arc::new(UnavailableRepository),
        settings(),
    ));
    let catalog: Arc<dyn CatalogSource> = Arc::new(InMemoryCatalog::demo());
    let mut headers = HeaderMap::new();
    headers.insert(TOKEN_HEADER, HeaderValue::from_static(TOKEN));
    headers.insert(USER_HEADER, HeaderValue::from_static("user-42"));
    headers.insert(ROLES_HEADER, HeaderValue::from_static("loan_officer"));

    let response = submit_handler::<UnavailableRepository>(
        State(PublishingState { service, catalog }),
        Ok(Path("open_house".to_string())),
        headers,
        Ok(axum::Json(open_house_payload())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn page_routes_serve_view_and_downloads() {
    let (service, _) = build_service();
    let page = service
        .publish(&loan_officer(), Some(TOKEN), open_house_payload())
        .expect("publish succeeds");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            Request::get(format!("/api/v1/pages/{}", page.id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["page_type_label"], "Open House");
    assert_eq!(body["co_branded"], true);

    let response = router
        .clone()
        .oneshot(
            Request::get(format!("/api/v1/pages/{}/event.ics", page.id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/calendar; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}.ics\"", page.id).as_str()
    );
    let body = read_body(response).await;
    assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/pages/{}/contact.vcf?party=partner", page.id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"dana-brooks.vcf\""
    );
    let body = read_body(response).await;
    assert!(body.contains("FN:Dana Brooks\r\n"));
}

#[tokio::test]
async fn unknown_page_and_bad_party_are_client_errors() {
    let (service, _) = build_service();
    let page = service
        .publish(&loan_officer(), Some(TOKEN), open_house_payload())
        .expect("publish succeeds");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/pages/page-missing/event.ics")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["message"], "page not found");

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/pages/{}/contact.vcf?party=buyer", page.id))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_route_filters_by_name() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/catalog/realtor?search=dana")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "re-201");
    assert_eq!(entries[0]["name"], "Dana Brooks");

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/brokers")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schema_route_describes_the_wizard() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/wizards/mortgage-calculator/schema")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["page_type"], "mortgage_calculator");
    assert_eq!(body["steps"].as_array().expect("steps").len(), 3);
}
