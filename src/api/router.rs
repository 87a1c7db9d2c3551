//! Router construction.

use crate::api::handlers::{home, metrics_handler, query_claude, AppState};
use crate::core::{request_id_middleware, MetricsMiddleware};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// CORS policy: any origin, with credentials.
///
/// Credentials rule out a literal `*` origin, so the request origin is echoed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/claude", post(query_claude))
        .route("/metrics", get(metrics_handler))
        .layer(axum::middleware::from_fn(MetricsMiddleware::track_metrics))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
