//! Logging initialization for hosts embedding the engine.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber with env-filter support and routes `log`
/// macros (used by parts of this crate and its dependencies) into it.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with_default_filter("info");
}

pub fn init_with_default_filter(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
