//! # API Errors
//!
//! Maps validation, request-shape and store failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::customer::{ValidationErrors, Violation};
use crate::store::StoreError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body failed field validation
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// Body is not JSON of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Query string could not be parsed
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Addressed record is absent
    #[error("Resource not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Database call failed
    #[error("Database error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let code = err.status_code().as_u16();
        let error = err.to_string();
        let violations = match err {
            ApiError::Validation(errors) => errors.violations,
            _ => Vec::new(),
        };
        Self {
            error,
            code,
            violations,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Not-found carries no body
            ApiError::NotFound => status.into_response(),
            ApiError::Store(ref err) => {
                tracing::error!(error = %err, "database call failed");
                (status, Json(ErrorResponse::from(self))).into_response()
            }
            _ => (status, Json(ErrorResponse::from(self))).into_response(),
        }
    }
}
