//! Helpers for building upstream requests and reading upstream errors.

use crate::api::claude_models::constants;
use serde::Serialize;
use serde_json::Value;

/// Build a Messages API request with Anthropic auth and version headers.
pub fn build_upstream_request<T: Serialize + ?Sized>(
    http_client: &reqwest::Client,
    url: &str,
    payload: &T,
    api_key: &str,
) -> reqwest::RequestBuilder {
    http_client
        .post(url)
        .header("x-api-key", api_key)
        .header("anthropic-version", constants::ANTHROPIC_VERSION)
        .json(payload)
}

/// Extract canonical error message from provider error payload.
pub fn extract_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
        .or_else(|| {
            body.get("error")
                .and_then(|e| e.as_str())
                .map(|s| s.to_string())
        })
        .or_else(|| {
            body.get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
}

/// Read the message of a non-success upstream response.
///
/// Prefers the structured error message, then the raw body, then the status line.
pub async fn read_upstream_error(response: reqwest::Response) -> String {
    let status = response.status();
    let raw_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read upstream error body");
            String::new()
        }
    };

    let parsed = serde_json::from_str::<Value>(&raw_text)
        .ok()
        .and_then(|body| extract_error_message(&body));

    match parsed {
        Some(message) => message,
        None if !raw_text.trim().is_empty() => raw_text.trim().to_string(),
        None => format!("HTTP {}", status),
    }
}
