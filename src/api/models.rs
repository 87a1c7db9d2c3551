//! Request and response models for the relay's own HTTP API.

use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/claude`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueryRequest {
    /// Text to send to the model. Absent, `null`, and `""` all count as missing.
    #[serde(default)]
    pub query: Option<String>,
}

impl QueryRequest {
    /// Query text as it should appear in logs; empty when absent.
    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// Return the query text, or the "No query provided" error.
    pub fn into_query(self) -> Result<String> {
        match self.query {
            Some(query) if !query.is_empty() => Ok(query),
            _ => Err(AppError::no_query()),
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryResponse {
    pub response: String,
}
