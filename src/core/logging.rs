//! Logging setup and request context.
//!
//! Installs the `tracing` subscriber and provides a task-local request ID so
//! every log line emitted while handling a request can be correlated.

use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

tokio::task_local! {
    /// Task-local storage for the current request ID.
    pub static REQUEST_ID: String;
}

/// Get the current request ID from context, if set.
///
/// Returns an empty string if no request ID is set.
pub fn get_request_id() -> String {
    REQUEST_ID.try_with(|id| id.clone()).unwrap_or_default()
}

/// Generate a new unique request ID using UUID v4.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Custom time formatter that uses local timezone (respects TZ environment variable)
struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Build the log filter directive.
///
/// `RUST_LOG` replaces the default base filter, but noisy HTTP client crates
/// are always capped at `warn`.
fn filter_directive(rust_log: Option<String>) -> String {
    let base_filter = rust_log.unwrap_or_else(|| "info,claude_relay=debug".to_string());
    format!("{},hyper=warn,h2=warn,reqwest=warn", base_filter)
}

/// Initialize the global tracing subscriber.
///
/// Set `NO_COLOR` to disable ANSI colors (for file logging) and `LOG_FORMAT=json`
/// for structured JSON output.
pub fn init_tracing() {
    let filter =
        tracing_subscriber::EnvFilter::new(filter_directive(std::env::var("RUST_LOG").ok()));
    let no_color = std::env::var("NO_COLOR").is_ok();
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_timer(LocalTime))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(!no_color),
            )
            .init();
    }
}
