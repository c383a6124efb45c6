//! REST API error types and status-code mapping
//!
//! Repository errors are translated here; response bodies carry the typed
//! message only, never store internals or transport detail (those are
//! logged at the gateway).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::repo::RepoError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Record fails a field invariant
    #[error("{0}")]
    Validation(String),

    /// Invalid request body
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Record not found
    #[error("Record not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Datastore missing, unreachable, or failing
    #[error("Storage backend unavailable")]
    Unavailable,

    /// Internal error (query construction defect)
    #[error("Internal error")]
    Internal,

    /// Operation exceeded its deadline
    #[error("Request timed out")]
    Timeout,
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Validation(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<RepoError> for RestError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(v) => RestError::Validation(v.to_string()),
            RepoError::NotFound(_) => RestError::NotFound,
            RepoError::NotReady(_) | RepoError::Read(_) | RepoError::Write(_) => {
                RestError::Unavailable
            }
            RepoError::QueryBuild(_) => RestError::Internal,
            RepoError::Cancelled => RestError::Timeout,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::ValidationError;
    use crate::store::StoreError;

    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            RestError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RestError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RestError::Unavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RestError::Timeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn repo_error_mapping() {
        let validation: RestError = RepoError::Validation(ValidationError::EmptyName).into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let not_found: RestError = RepoError::NotFound("9".to_string()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let not_ready: RestError = RepoError::NotReady("gone".to_string()).into();
        assert_eq!(not_ready.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let write: RestError = RepoError::Write(StoreError::Rejected { status: 503 }).into();
        assert_eq!(write.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let cancelled: RestError = RepoError::Cancelled.into();
        assert_eq!(cancelled.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn store_detail_never_reaches_response_body() {
        let write: RestError = RepoError::Write(StoreError::Rejected { status: 500 }).into();
        let body = ErrorResponse::from(write);
        assert_eq!(body.error, "Storage backend unavailable");
    }
}
