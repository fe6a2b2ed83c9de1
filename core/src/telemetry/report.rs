//! telemetry/report.rs
//! Tallies collected while folding one snapshot pair.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::telemetry::timers::StageTimes;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Scalar leaves visited.
    pub leaves: u64,
    /// Leaves seen for the first time.
    pub created: u64,
    /// Leaves whose current window reset since the last call.
    pub rollovers: u64,
    /// Leaves whose raw value was not a usable count.
    pub coerced: u64,
    /// Empty lists skipped.
    pub empty_lists: u64,
    /// Net increment over all cumulative counters.
    pub increment: u64,
    pub stage_times: StageTimes,
}

impl ReconcileReport {
    /// Record one folded leaf.
    pub fn add_leaf(&mut self, created: bool, rollover: bool, coerced: bool, increment: u64) {
        self.leaves += 1;
        self.created += created as u64;
        self.rollovers += rollover as u64;
        self.coerced += coerced as u64;
        self.increment = self.increment.saturating_add(increment);
    }

    pub fn add_empty_list(&mut self) {
        self.empty_lists += 1;
    }

    pub fn merge(&mut self, other: &ReconcileReport) {
        self.leaves += other.leaves;
        self.created += other.created;
        self.rollovers += other.rollovers;
        self.coerced += other.coerced;
        self.empty_lists += other.empty_lists;
        self.increment = self.increment.saturating_add(other.increment);
        self.stage_times.merge(&other.stage_times);
    }
}

impl AddAssign for ReconcileReport {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
