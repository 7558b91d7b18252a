//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so translated HTML on stdout stays pipeable.

use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default filter directive.
pub const fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbosity`.
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
