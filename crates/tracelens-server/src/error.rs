//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON
//! error responses with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use tracelens_analyze::AnalyzeError;
use tracelens_core::error::CoreError;
use tracelens_engine::EngineError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A configured capacity was reached (429).
    #[error("capacity exceeded: {0}")]
    Capacity(String),

    /// The requested feature is disabled by configuration (403).
    #[error("feature disabled: {0}")]
    FeatureDisabled(String),

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub(crate) fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Capacity(_) => (StatusCode::TOO_MANY_REQUESTS, "CAPACITY_EXCEEDED"),
            ApiError::FeatureDisabled(_) => (StatusCode::FORBIDDEN, "FEATURE_DISABLED"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let detail = ApiErrorDetail {
            code: code.to_string(),
            message: self.to_string(),
            details: None,
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::TraceNotFound(_)
            | CoreError::BreakpointNotFound(_)
            | CoreError::WatchNotFound(_)
            | CoreError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::TraceImmutable(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::CapacityExceeded { .. } => ApiError::Capacity(err.to_string()),
            EngineError::FeatureDisabled => ApiError::FeatureDisabled(err.to_string()),
            EngineError::InvalidExpression(_) => ApiError::BadRequest(err.to_string()),
            EngineError::NoStepSession(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}
