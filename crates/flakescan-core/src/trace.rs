//! Tracing initialization for embedding callers.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `FLAKESCAN_LOG`.
///
/// Falls back to `info` when the variable is unset. Safe to call more than
/// once; later calls are no-ops.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("FLAKESCAN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
