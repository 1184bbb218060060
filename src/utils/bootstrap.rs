//! Bootstrap utilities for the generator binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "WRAPGEN_LOG";

/// Initialize tracing with the WRAPGEN_LOG environment variable.
///
/// Defaults to "warn" if WRAPGEN_LOG is not set. Logs go to stderr so
/// `--stdout` output stays clean.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
