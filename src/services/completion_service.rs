//! Upstream completion service.
//!
//! Sends one single-turn Messages API request per query and returns the text of
//! the first content block. Failures come back as a tagged [`UpstreamError`];
//! nothing is retried.

use crate::api::claude_models::{constants, ClaudeMessagesRequest, ClaudeResponse};
use crate::api::upstream::{build_upstream_request, read_upstream_error};
use crate::core::config::AnthropicConfig;
use crate::core::metrics::get_metrics;
use std::error::Error as _;
use std::time::Instant;
use thiserror::Error;

/// Ways the upstream call can fail.
///
/// The `Display` output is the message relayed to the caller after `API Error: `.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Error code: {status} - {message}")]
    Status { status: u16, message: String },

    /// The success body could not be decoded
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// The reply had no content blocks, or the first one was not text
    #[error("Response contained no text content")]
    EmptyContent,
}

/// Client for the Anthropic Messages API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct CompletionService {
    http_client: reqwest::Client,
    messages_url: String,
    api_key: String,
}

impl CompletionService {
    pub fn new(config: &AnthropicConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            messages_url: format!("{}{}", config.api_base, constants::MESSAGES_PATH),
            api_key: config.api_key.clone(),
        }
    }

    /// URL the service posts to.
    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    /// Send `query` as a single user message and return the generated text.
    #[tracing::instrument(skip(self, query), fields(model = constants::MODEL))]
    pub async fn complete(&self, query: &str) -> Result<String, UpstreamError> {
        let start = Instant::now();
        let result = self.send(query).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        get_metrics()
            .upstream_latency
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn send(&self, query: &str) -> Result<String, UpstreamError> {
        let payload = ClaudeMessagesRequest::for_query(query);

        let response = build_upstream_request(
            &self.http_client,
            &self.messages_url,
            &payload,
            &self.api_key,
        )
        .send()
        .await
        .map_err(|e| {
            tracing::error!(
                url = %self.messages_url,
                error = %e,
                error_source = ?e.source(),
                is_timeout = e.is_timeout(),
                is_connect = e.is_connect(),
                "HTTP request to Anthropic failed"
            );
            UpstreamError::from(e)
        })?;

        let status = response.status();
        tracing::debug!(status = %status, "Anthropic request completed");

        if !status.is_success() {
            let message = read_upstream_error(response).await;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let body: ClaudeResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::InvalidBody(e.to_string()))?;

        record_usage(&body);

        body.first_text()
            .map(str::to_string)
            .ok_or(UpstreamError::EmptyContent)
    }
}

fn record_usage(body: &ClaudeResponse) {
    let Some(usage) = &body.usage else {
        return;
    };
    let model = if body.model.is_empty() {
        constants::MODEL
    } else {
        body.model.as_str()
    };

    let metrics = get_metrics();
    metrics
        .token_usage
        .with_label_values(&[model, "input"])
        .inc_by(usage.input_tokens);
    metrics
        .token_usage
        .with_label_values(&[model, "output"])
        .inc_by(usage.output_tokens);
}
