// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level filter from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global subscriber.
///
/// # Environment
/// - RUST_LOG: level filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=windpark_settlement=trace
///
/// # Example
/// ```no_run
/// use windpark_settlement::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes logging for tests.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("windpark_settlement=debug"))
        .with_test_writer()
        .try_init();
}
