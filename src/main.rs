//! Claude Relay - Main entry point
//!
//! Validates configuration, then creates and runs the HTTP server.

use anyhow::Result;
use claude_relay::{
    api::{app_router, AppState},
    core::{init_metrics, init_tracing, AppConfig},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    init_tracing();
    init_metrics();

    // Fails before anything is bound if the credential is missing or malformed
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let bind_host = config.server.host.clone();
    let port = config.server.port;

    let http_client = create_http_client()?;
    let state = Arc::new(AppState::new(config, http_client));
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind((bind_host.as_str(), port)).await?;
    tracing::info!("Starting Claude relay on {}", listener.local_addr()?);
    tracing::info!("Relay endpoint: POST /api/claude");
    tracing::info!("Metrics endpoint: /metrics");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the shared HTTP client used for every upstream call.
fn create_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .build()
}
