//! API layer for the relay server.
//!
//! This module contains the HTTP handlers, the router, the relay's own
//! request/response models, and the upstream Messages API wire types.

pub mod claude_models;
pub mod handlers;
pub mod models;
pub mod router;
pub mod upstream;

// Re-export commonly used types
pub use handlers::{home, metrics_handler, query_claude, AppState};
pub use models::{QueryRequest, QueryResponse};
pub use router::{app_router, cors_layer};
