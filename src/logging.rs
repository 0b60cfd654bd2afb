//! Logging setup
//!
//! Logs go to stderr so that stdout carries only command output. `RUST_LOG`
//! takes precedence over the `-v` count when set.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "docli=warn",
        1 => "docli=info",
        2 => "docli=debug",
        _ => "docli=trace",
    }
}

/// Installs the global subscriber; later calls are no-ops
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
