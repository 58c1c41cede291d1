//! Tracing subscriber setup for embedding applications.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `level` is the default filter directive, overridden by `RUST_LOG` when
/// set. `format` selects the output shape: `"json"` emits one JSON object
/// per event, anything else the human-readable default.
pub fn init_tracing(level: &str, format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
