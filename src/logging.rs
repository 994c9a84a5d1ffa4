//! Logging configuration using tracing
//!
//! Structured logging to stderr with support for the RUST_LOG environment
//! variable. Stdout is left free for the invocation result.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// - Filtering via RUST_LOG (defaults to "info", a sync run is short and
///   its progress lines are the audit trail)
/// - Pretty output for terminals, or one JSON object per line when `json`
///   is set, for log collectors
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init(json: bool) -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| crate::SyncError::Config(format!("Failed to initialize tracing: {}", e)))
}

/// Initialize logging for tests (no-op if already initialized)
#[cfg(test)]
pub(crate) fn init_test() {
    let _ = init(false);
}
