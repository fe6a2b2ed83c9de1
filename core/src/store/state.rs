//! store/state.rs
//! `StateStore`: the engine's single entry point for collaborators.
//!
//! Mutating calls take `&mut self`; callers sharing a store across threads
//! must wrap it in their own lock. Every mutation is followed by a full
//! synchronous rewrite of the image. When that write fails the error is
//! returned, the in-memory tree keeps the new values, and the next
//! successful write catches the image up.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::counters::{reconcile, CounterRecord};
use crate::snapshot::{GroupKey, GroupPath};
use crate::store::persist::{load_tree, save_tree};
use crate::store::tree::StateTree;
use crate::telemetry::{timed, ReconcileReport, Stage};
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct StateStore {
    /// `None` keeps the store purely in memory.
    path: Option<PathBuf>,
    tree: StateTree,
}

impl StateStore {
    /// Open the image at `path`, starting empty if there is none.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tree = load_tree(&path);
        Self { path: Some(path), tree }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    /// Rewrite the durable image in full.
    pub fn persist(&self) -> Result<()> {
        match &self.path {
            Some(path) => save_tree(path, &self.tree),
            None => Ok(()),
        }
    }

    /// Fold the `(current, previous)` snapshot pair of one metric family
    /// into the counters under `label`, then persist.
    pub fn update(
        &mut self,
        label: impl Into<GroupPath>,
        current: &Value,
        previous: Option<&Value>,
    ) -> Result<ReconcileReport> {
        let label = label.into();
        let mut report = reconcile(&mut self.tree.counters, &label, current, previous)?;
        timed(&mut report.stage_times, Stage::Persist, || self.persist())?;

        debug!(
            group = %label,
            leaves = report.leaves,
            rollovers = report.rollovers,
            increment = report.increment,
            "reconciled snapshot"
        );
        Ok(report)
    }

    pub fn record(&self, key: &GroupKey) -> Option<&CounterRecord> {
        self.tree.record(key)
    }

    /// Cumulative value of one leaf, 0 if never observed.
    pub fn counter(&self, key: &GroupKey) -> u64 {
        self.tree.counter(key)
    }

    pub fn counter_at(&self, group: &str, leaf: &str) -> u64 {
        self.counter(&GroupKey::new(group, leaf))
    }

    /// Tag -> cumulative value for a breakdown group (per country, per status
    /// code, ...). Empty if the group was never observed.
    pub fn group_counters(&self, group: &GroupPath) -> BTreeMap<String, u64> {
        self.tree.group_counters(group)
    }

    pub fn time(&self, name: &str) -> Option<&str> {
        self.tree.timestamps.get(name).map(String::as_str)
    }

    pub fn update_time(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.tree.timestamps.insert(name.to_string(), value.into());
        self.persist()
    }

    pub fn cached(&self, name: &str, default: Value) -> Value {
        self.tree.cache.get(name).cloned().unwrap_or(default)
    }

    pub fn set_cached(&mut self, name: &str, value: Value) -> Result<()> {
        self.tree.cache.insert(name.to_string(), value);
        self.persist()
    }
}
