//! Logging setup for the hosting process.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once at startup; the log
/// level is taken from `RUST_LOG` and defaults to `info`.
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
}
