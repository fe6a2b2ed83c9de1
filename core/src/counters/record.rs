//! counters/record.rs
//! Per-leaf bookkeeping and the hourly-delta rule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::GroupPath;

/// Group -> leaf name -> record.
pub type CounterTree = BTreeMap<GroupPath, BTreeMap<String, CounterRecord>>;

/// Bookkeeping for one leaf counter.
///
/// `counter` is the externally visible cumulative total and never decreases.
/// The two hour counts hold the latest raw observation of each window.
/// `deficit` is net shrinkage not yet taken back from `counter`; it is paid
/// down by later growth before anything is added again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterRecord {
    pub counter: u64,
    pub current_hour_count: u64,
    pub previous_hour_count: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub deficit: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// Outcome of folding one raw pair into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub rollover: bool,
    pub increment: u64,
}

impl CounterRecord {
    /// Fold the raw `current` and `previous` window values into the record.
    ///
    /// - A current value below the stored one means upstream started a new
    ///   hour: the stored current count becomes the closing value of the
    ///   previous window and counting restarts from 0.
    /// - Only what grew since the last observation of each window is added.
    /// - A negative net delta adds nothing and is carried in `deficit`, so
    ///   the recovery that follows is not counted twice.
    pub fn observe(&mut self, current: u64, previous: u64) -> Observation {
        let rollover = current < self.current_hour_count;
        if rollover {
            self.previous_hour_count = self.current_hour_count;
            self.current_hour_count = 0;
        }

        let delta = (i128::from(current) - i128::from(self.current_hour_count))
            + (i128::from(previous) - i128::from(self.previous_hour_count));
        let increment = if delta < 0 {
            let shortfall = u64::try_from(-delta).unwrap_or(u64::MAX);
            self.deficit = self.deficit.saturating_add(shortfall);
            0
        } else {
            let growth = u64::try_from(delta).unwrap_or(u64::MAX);
            let repaid = growth.min(self.deficit);
            self.deficit -= repaid;
            growth - repaid
        };

        self.counter = self.counter.saturating_add(increment);
        self.current_hour_count = current;
        self.previous_hour_count = previous;

        Observation { rollover, increment }
    }
}
