//! Logging setup for the shop binary and tests.
//!
//! Barber threads are named `barber-N` and the scheduler `shop-clock`, so
//! thread names are part of every line.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: shop lifecycle at info, per-client
/// events stay at debug.
pub const DEFAULT_FILTER: &str = "prometheus_barbershop=info,barbershop=info";

/// Install a `tracing` subscriber reading `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`]. Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_FILTER);
}

/// Like [`init_tracing`] with a caller-chosen fallback filter.
pub fn init_tracing_with(fallback: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init();
}
