//! telemetry/mod.rs
//! Per-call reconciliation telemetry: tallies and stage timings.
//!
//! Reports are plain values. A driver that reconciles several metric
//! families per cycle can sum them with `+=`.

pub mod report;
pub mod timers;

pub use report::*;
pub use timers::*;
