//! Business logic services for the relay.
//!
//! This module contains the service that talks to the upstream completion API.

pub mod completion_service;

// Re-export commonly used types
pub use completion_service::{CompletionService, UpstreamError};
