//! Logging initialization.
//!
//! Logs go to stderr so the clock on stdout stays clean. `POMOTICK_LOG`
//! takes precedence over both the `-v` flags and the configured level.

use tracing_subscriber::EnvFilter;

/// Maps a verbosity level to a tracing directive string, falling back to
/// the configured level when no `-v` flag was given.
pub fn verbosity_to_directive(verbosity: u8, configured: &str) -> &str {
    match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Uses `try_init()` so calling this more than once is harmless.
pub fn init_logging(verbosity: u8, configured: &str) {
    let directive = verbosity_to_directive(verbosity, configured);
    let filter = EnvFilter::try_from_env("POMOTICK_LOG")
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
