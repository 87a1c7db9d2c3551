//! HTTP request handlers for the relay API.
//!
//! This module contains the query endpoint, the root greeting, and metrics.

use crate::api::models::{QueryRequest, QueryResponse};
use crate::core::config::AppConfig;
use crate::core::logging::get_request_id;
use crate::core::{AppError, Result};
use crate::services::CompletionService;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

/// Shared application state.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub completion_service: CompletionService,
}

impl AppState {
    pub fn new(config: AppConfig, http_client: reqwest::Client) -> Self {
        let completion_service = CompletionService::new(&config.anthropic, http_client);
        Self {
            config,
            completion_service,
        }
    }
}

/// Static greeting used as a liveness probe.
pub async fn home() -> Html<&'static str> {
    Html("<h1>Hello world</h1>")
}

/// Relay a caller's query to Claude and return the generated text.
///
/// A body that is not a JSON object with an optional string `query` is
/// reported as an unexpected error (500), not a client error.
pub async fn query_claude(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(payload) = payload?;

    tracing::info!(
        request_id = %get_request_id(),
        "Received query: {}",
        payload.query_text()
    );

    let query = payload.into_query()?;

    let response = state.completion_service.complete(&query).await?;

    Ok(Json(QueryResponse { response }))
}

/// Prometheus metrics endpoint.
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response())
}
