//! Logging setup
//!
//! Logs go to stderr so stdout stays clean for command output. The level can
//! be controlled with `RUST_LOG`; otherwise `-v` flags raise it from `warn`.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "sportsleagues=warn",
        1 => "sportsleagues=info",
        _ => "sportsleagues=debug",
    }
}

/// Installs the global tracing subscriber
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
