//! hourly-counter-core
//!
//! Rebuilds monotonic cumulative counters from overlapping hourly window
//! snapshots and keeps them in a durable JSON image across restarts.
//! No Python, no PyO3, no network.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod logging;
pub mod types;
pub mod utils;

// Engine
pub mod counters;
pub mod snapshot;
pub mod store;
pub mod telemetry;

pub mod scheduler;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::counters::{CounterRecord, Observation};
    pub use crate::scheduler::{CrawlDecision, CrawlPolicy};
    pub use crate::snapshot::{GroupKey, GroupPath};
    pub use crate::store::{StateStore, StateTree};
    pub use crate::telemetry::ReconcileReport;
    pub use crate::types::{Result, StateError};
}
