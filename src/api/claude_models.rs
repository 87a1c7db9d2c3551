//! Anthropic Messages API request and response models.
//!
//! Only the subset of the wire format the relay sends and reads is modeled.

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Constants for Anthropic API integration.
pub mod constants {
    /// Model used for every relayed query.
    pub const MODEL: &str = "claude-3-sonnet-20240229";

    /// Upper bound on generated tokens per reply.
    pub const MAX_TOKENS: u32 = 1000;

    /// Sampling temperature; zero keeps generation deterministic.
    pub const TEMPERATURE: f32 = 0.0;

    /// Value sent in the `anthropic-version` header.
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    /// Path of the Messages endpoint relative to the API base.
    pub const MESSAGES_PATH: &str = "/v1/messages";

    // Role constants
    pub const ROLE_USER: &str = "user";
}

// ============================================================================
// Request Types
// ============================================================================

/// A single message in a Messages API request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeMessage {
    pub role: String,
    pub content: String,
}

impl ClaudeMessage {
    /// User-role message with plain text content.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: constants::ROLE_USER.to_string(),
            content: content.into(),
        }
    }
}

/// Messages API request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeMessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<ClaudeMessage>,
}

impl ClaudeMessagesRequest {
    /// Single-turn request for `query` with the fixed model and sampling settings.
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            model: constants::MODEL.to_string(),
            max_tokens: constants::MAX_TOKENS,
            temperature: constants::TEMPERATURE,
            messages: vec![ClaudeMessage::user(query)],
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Content block in a Messages API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeContentBlock {
    Text {
        text: String,
    },
    /// Tool use, thinking, and any block type added later.
    #[serde(other)]
    Unsupported,
}

/// Token usage reported by the Messages API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaudeUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Messages API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub content: Vec<ClaudeContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<ClaudeUsage>,
}

impl ClaudeResponse {
    /// Text of the first content block, if that block is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ClaudeContentBlock::Text { text }) => Some(text),
            _ => None,
        }
    }
}
