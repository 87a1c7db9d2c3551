//! Claude Relay - a minimal HTTP relay in front of the Anthropic Messages API
//!
//! The server accepts `POST /api/claude` with `{"query": "..."}`, forwards the
//! query as a single user message to Claude with fixed model and sampling
//! settings, and returns `{"response": "..."}` with the generated text.
//!
//! # Architecture
//!
//! - [`core`]: configuration, errors, logging, metrics, middleware
//! - [`api`]: HTTP handlers, router, and request/response models
//! - [`services`]: the upstream completion call
//!
//! # Configuration
//!
//! The server requires the following environment variable:
//! - `ANTHROPIC_API_KEY`: Anthropic API key (must start with `sk-ant-`)
//!
//! Optional environment variables:
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 5001)
//! - `ANTHROPIC_API_BASE`: Upstream base URL (default: https://api.anthropic.com)
//! - `RUST_LOG`, `NO_COLOR`, `LOG_FORMAT`: logging controls

pub mod api;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::api::{app_router, AppState, QueryRequest, QueryResponse};
pub use crate::core::{AppConfig, AppError, Result};
pub use crate::services::{CompletionService, UpstreamError};
