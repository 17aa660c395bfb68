use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EvcoError {
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Unknown service: {0}")]
    ServiceNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Unknown migration version: {0}")]
    UnknownMigration(i64),

    #[error("Upstream request failed: {0}")]
    UpstreamError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl EvcoError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            EvcoError::RouteNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            EvcoError::ServiceNotFound(_) => (StatusCode::NOT_FOUND, "SERVICE_NOT_FOUND"),
            EvcoError::TableNotFound(_) => (StatusCode::NOT_FOUND, "TABLE_NOT_FOUND"),
            EvcoError::UnknownMigration(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_MIGRATION"),
            EvcoError::UpstreamError(e) if e.is_timeout() => {
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
            }
            EvcoError::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            EvcoError::DatabaseError(_) | EvcoError::MigrationError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for EvcoError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        // Handlers run inside the request-id middleware; fall back to a fresh id
        // only when rendered outside it.
        let request_id = crate::middleware::current_request_id()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id,
        };

        if status.is_server_error() {
            tracing::error!(
                error = ?self,
                error_code = error_code,
                "Request failed"
            );
        } else {
            tracing::warn!(error = %self, error_code = error_code, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
