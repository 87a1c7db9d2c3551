//! Configuration management for the relay server.
//!
//! Configuration comes from the process environment (optionally seeded from a
//! `.env` file). The Anthropic credential is validated here, once, before the
//! server accepts any traffic.

use anyhow::{anyhow, Result};
use std::fmt;

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Every Anthropic API key starts with this prefix.
pub const API_KEY_PREFIX: &str = "sk-ant-";

/// Number of key characters that may appear in logs and error messages.
const KEY_PREVIEW_LEN: usize = 10;

/// Main application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Server configuration (host, port)
    pub server: ServerConfig,

    /// Upstream Anthropic API configuration
    pub anthropic: AnthropicConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Upstream API configuration.
#[derive(Clone)]
pub struct AnthropicConfig {
    /// Validated, trimmed API key
    pub api_key: String,

    /// Base URL for the Messages API
    pub api_base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AnthropicConfig {
    /// Build upstream configuration for `api_key` against the public API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_api_base(),
        }
    }

    /// Point the client at a different API base (e.g. a mock server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Short, non-sensitive preview of the key for logs.
    pub fn key_preview(&self) -> String {
        key_preview(&self.api_key)
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.key_preview())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("server", &self.server)
            .field("anthropic", &self.anthropic)
            .finish()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails if `ANTHROPIC_API_KEY` is missing or does not look like an
    /// Anthropic key, or if `PORT` is not a valid port number.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use claude_relay::core::config::AppConfig;
    ///
    /// let config = AppConfig::from_env().expect("invalid configuration");
    /// ```
    pub fn from_env() -> Result<Self> {
        let api_key = validate_api_key(std::env::var(API_KEY_ENV).ok().as_deref())?;

        let mut anthropic = AnthropicConfig::new(api_key);
        if let Ok(api_base) = std::env::var("ANTHROPIC_API_BASE") {
            if !api_base.trim().is_empty() {
                anthropic = anthropic.with_api_base(api_base.trim());
            }
        }

        let mut server = ServerConfig::default();

        // Server host override
        if let Ok(host) = std::env::var("HOST") {
            server.host = host;
        }

        // Server port override
        if let Ok(port_str) = std::env::var("PORT") {
            server.port = port_str
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid PORT value '{}': {}", port_str, e))?;
        }

        tracing::info!(
            "API key loaded successfully: {}...",
            anthropic.key_preview()
        );

        Ok(Self { server, anthropic })
    }
}

/// Validate a raw credential value and return the key to use.
///
/// The prefix is checked against the raw value; the returned key has
/// surrounding whitespace removed.
pub fn validate_api_key(raw: Option<&str>) -> Result<String> {
    let raw = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return Err(anyhow!("{} not found in environment variables!", API_KEY_ENV)),
    };

    if !raw.starts_with(API_KEY_PREFIX) {
        return Err(anyhow!(
            "API key appears to be invalid format: {}...",
            key_preview(raw)
        ));
    }

    Ok(raw.trim().to_string())
}

/// First few characters of a key, safe to print.
pub fn key_preview(key: &str) -> String {
    key.chars().take(KEY_PREVIEW_LEN).collect()
}
