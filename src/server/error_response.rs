//! HTTP error response handling
//!
//! Converts catalog errors into status codes with JSON error bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// JSON error body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. `search_unavailable`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl From<&CatalogError> for ApiError {
    fn from(error: &CatalogError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}

/// Status code a catalog error is reported with.
#[must_use]
pub fn status_for(error: &CatalogError) -> StatusCode {
    match error {
        CatalogError::SearchUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CatalogError::Network { .. } | CatalogError::Decode { .. } => StatusCode::BAD_GATEWAY,
        CatalogError::InvalidEndpoint { .. } | CatalogError::Client { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        (status, Json(ApiError::from(&self))).into_response()
    }
}
