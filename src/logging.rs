//! Logging setup for the CLI
//!
//! Logs go to stderr so JSON on stdout stays machine-readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate-specific log level variable, checked after `RUST_LOG`
pub const LOG_ENV: &str = "SITE_GUARD_LOG";

/// Filter directive used when no environment variable is set
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over [`LOG_ENV`], which wins over `verbosity`.
pub fn initialize_logging(verbosity: u8) {
    let directive = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .unwrap_or_else(|_| default_directive(verbosity));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second init (e.g. from tests) is not an error worth surfacing
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(EnvFilter::new(directive))
        .try_init();
}
