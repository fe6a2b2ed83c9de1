//! logging.rs
//! Subscriber setup for binaries and bindings embedding the engine.
//! The library itself only emits `tracing` events.

use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_LOG_LEVEL;

/// Install a global fmt subscriber filtered by `directive`.
///
/// An invalid directive falls back to the default level. Returns `false`
/// when a global subscriber was already installed.
pub fn init_tracing(directive: &str) -> bool {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
