//! counters/mod.rs
//! Hourly-delta reconciliation of rolling window snapshots into cumulative
//! counters.

pub mod reconcile;
pub mod record;

pub use reconcile::*;
pub use record::*;
