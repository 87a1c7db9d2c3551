//! Error types and handling for the relay server.
//!
//! This module provides a unified error type [`AppError`] for request handling
//! and implements its conversion into the `{"error": "..."}` response body.

use crate::core::logging::get_request_id;
use crate::services::UpstreamError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when the caller sends no usable query.
pub const NO_QUERY_MESSAGE: &str = "No query provided";

/// Main error type for request handling.
///
/// The `Display` output of each variant is exactly the `error` field returned
/// to the caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// Client provided invalid data
    #[error("{0}")]
    BadRequest(String),

    /// The upstream completion call failed
    #[error("API Error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Anything else that went wrong while handling the request
    #[error("An error occurred: {0}")]
    Internal(String),
}

impl AppError {
    /// Error for a missing or empty `query` field.
    pub fn no_query() -> Self {
        AppError::BadRequest(NO_QUERY_MESSAGE.to_string())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Internal(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let request_id = get_request_id();
        match &self {
            AppError::BadRequest(_) => {
                tracing::warn!(request_id = %request_id, error = %message, "Rejected request")
            }
            AppError::Upstream(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Anthropic API error")
            }
            AppError::Internal(_) => {
                tracing::error!(request_id = %request_id, error = %message, "General error")
            }
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
