use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::domain::{PageId, PageView, Party};
use super::repository::{PageRepository, RepositoryError};
use super::service::{PagePublishingService, PublishError};
use crate::formats::{ics, vcard};
use crate::workflows::catalog::CatalogSource;
use crate::workflows::wizard::{
    CatalogKind, CreatorIdentity, PageType, PublishedLink, SubmissionPayload, SubmissionResponse,
    WizardSchema,
};

pub const TOKEN_HEADER: &str = "x-submit-token";
pub const USER_HEADER: &str = "x-user-id";
pub const ROLES_HEADER: &str = "x-user-roles";

/// Shared state for the page routes.
pub struct PublishingState<R> {
    pub service: Arc<PagePublishingService<R>>,
    pub catalog: Arc<dyn CatalogSource>,
}

impl<R> Clone for PublishingState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

/// Router builder exposing wizard submission, page downloads, and catalog lookups.
pub fn page_router<R>(
    service: Arc<PagePublishingService<R>>,
    catalog: Arc<dyn CatalogSource>,
) -> Router
where
    R: PageRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/wizards/:page_type/submit",
            post(submit_handler::<R>),
        )
        .route("/api/v1/wizards/:page_type/schema", get(schema_handler))
        .route("/api/v1/pages/:page_id", get(page_handler::<R>))
        .route("/api/v1/pages/:page_id/event.ics", get(calendar_handler::<R>))
        .route(
            "/api/v1/pages/:page_id/contact.vcf",
            get(contact_handler::<R>),
        )
        .route("/api/v1/catalog/:kind", get(catalog_handler::<R>))
        .with_state(PublishingState { service, catalog })
}

/// Caller identity from the host platform's `x-user-id` and `x-user-roles` headers.
pub(crate) fn identity_from_headers(headers: &HeaderMap) -> CreatorIdentity {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let roles = header_text(ROLES_HEADER);
    CreatorIdentity::new(
        header_text(USER_HEADER),
        roles
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string),
    )
}

pub(crate) fn status_for(error: &PublishError) -> StatusCode {
    match error {
        PublishError::InvalidToken | PublishError::RoleNotPermitted(_) => StatusCode::FORBIDDEN,
        PublishError::MissingIdentity => StatusCode::UNAUTHORIZED,
        PublishError::PageTypeMismatch { .. } => StatusCode::BAD_REQUEST,
        PublishError::WrongPartnerKind { .. }
        | PublishError::Validation(_)
        | PublishError::EmbedOnly
        | PublishError::Format(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PublishError::NoSchedule(_)
        | PublishError::NoSuchParty(_)
        | PublishError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PublishError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PublishError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Failure bodies share the submission envelope: `{success: false, data: {message}}`.
pub(crate) fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(SubmissionResponse::failed(message))).into_response()
}

fn error_response(error: PublishError) -> Response {
    failure(status_for(&error), error.to_string())
}

pub(crate) async fn submit_handler<R>(
    State(state): State<PublishingState<R>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    payload: Result<axum::Json<SubmissionPayload>, JsonRejection>,
) -> Response
where
    R: PageRepository + 'static,
{
    let page_type = match path {
        Ok(Path(page_type)) => page_type,
        Err(rejection) => return failure(rejection.status(), rejection.body_text()),
    };
    let payload = match payload {
        Ok(axum::Json(payload)) => payload,
        Err(rejection) => return failure(rejection.status(), rejection.body_text()),
    };

    let Some(expected) = PageType::from_slug(&page_type) else {
        return failure(StatusCode::NOT_FOUND, format!("unknown wizard '{page_type}'"));
    };

    let result = if payload.page_type != expected {
        Err(PublishError::PageTypeMismatch {
            expected,
            found: payload.page_type,
        })
    } else {
        let identity = identity_from_headers(&headers);
        let token = headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        state.service.publish(&identity, token, payload)
    };

    match result {
        Ok(page) => {
            let body = SubmissionResponse::published(PublishedLink {
                id: page.id.0,
                url: page.url,
            });
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schema_handler(Path(page_type): Path<String>) -> Response {
    match PageType::from_slug(&page_type) {
        Some(page_type) => {
            (StatusCode::OK, axum::Json(WizardSchema::for_page(page_type))).into_response()
        }
        None => failure(StatusCode::NOT_FOUND, format!("unknown wizard '{page_type}'")),
    }
}

pub(crate) async fn page_handler<R>(
    State(state): State<PublishingState<R>>,
    Path(page_id): Path<String>,
) -> Response
where
    R: PageRepository + 'static,
{
    match state.service.get(&PageId(page_id)) {
        Ok(page) => (StatusCode::OK, axum::Json(PageView::from(&page))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn calendar_handler<R>(
    State(state): State<PublishingState<R>>,
    Path(page_id): Path<String>,
) -> Response
where
    R: PageRepository + 'static,
{
    let id = PageId(page_id);
    match state.service.calendar(&id, Utc::now()) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, ics::CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{id}.ics\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContactQuery {
    #[serde(default)]
    pub(crate) party: Option<String>,
}

pub(crate) async fn contact_handler<R>(
    State(state): State<PublishingState<R>>,
    Path(page_id): Path<String>,
    query: Result<Query<ContactQuery>, QueryRejection>,
) -> Response
where
    R: PageRepository + 'static,
{
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return failure(rejection.status(), rejection.body_text()),
    };
    let Some(party) = Party::from_query(query.party.as_deref()) else {
        return failure(
            StatusCode::BAD_REQUEST,
            "party must be 'primary' or 'partner'",
        );
    };

    match state.service.contact_card(&PageId(page_id), party) {
        Ok((file_name, body)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, vcard::CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CatalogQuery {
    #[serde(default)]
    pub(crate) search: Option<String>,
}

pub(crate) async fn catalog_handler<R>(
    State(state): State<PublishingState<R>>,
    Path(kind): Path<String>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> Response
where
    R: PageRepository + 'static,
{
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return failure(rejection.status(), rejection.body_text()),
    };
    let Some(kind) = CatalogKind::from_slug(&kind) else {
        return failure(StatusCode::NOT_FOUND, format!("unknown catalog '{kind}'"));
    };

    match state.catalog.list(kind, query.search.as_deref()) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => failure(StatusCode::SERVICE_UNAVAILABLE, error.to_string()),
    }
}
