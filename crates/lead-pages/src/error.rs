use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::catalog::CatalogError;
use crate::workflows::publishing::PublishError;
use crate::workflows::wizard::SessionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

/// Failures surfaced by the binaries and the HTTP boundary.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    Publish(PublishError),
    Wizard(SessionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Catalog(err) => write!(f, "catalog error: {err}"),
            AppError::Publish(err) => write!(f, "publishing error: {err}"),
            AppError::Wizard(err) => write!(f, "wizard error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Publish(err) => Some(err),
            AppError::Wizard(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Publish(err) => crate::workflows::publishing::router::status_for(err),
            AppError::Wizard(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        crate::workflows::publishing::router::failure(status, self.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<PublishError> for AppError {
    fn from(value: PublishError) -> Self {
        Self::Publish(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Wizard(value)
    }
}
