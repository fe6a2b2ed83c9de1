//! store/tree.rs
//! In-memory image of the durable state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::constants::image_keys;
use crate::counters::{CounterRecord, CounterTree};
use crate::snapshot::{GroupKey, GroupPath};

/// Everything that survives a restart.
///
/// Unknown top-level keys in a stored image are ignored and missing
/// sections default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTree {
    #[serde(default)]
    pub counters: CounterTree,
    /// Named timestamps, e.g. the last crawl of a sub-feed.
    #[serde(default)]
    pub timestamps: BTreeMap<String, String>,
    /// Small cached results keyed by name.
    #[serde(default)]
    pub cache: BTreeMap<String, Value>,
}

impl StateTree {
    /// Build a tree from a parsed image.
    ///
    /// An object with neither a `counters` nor a `timestamps` section is the
    /// older flat layout (`{group: {leaf: record}, name: "timestamp",
    /// "cache": {...}}`) and is migrated; the next write stores it sectioned.
    pub fn from_image(image: Value) -> serde_json::Result<Self> {
        match image {
            Value::Object(map) if is_flat_layout(&map) => Ok(Self::from_flat(map)),
            other => serde_json::from_value(other),
        }
    }

    fn from_flat(map: Map<String, Value>) -> Self {
        let mut tree = Self::default();
        for (name, value) in map {
            match value {
                Value::String(stamp) => {
                    tree.timestamps.insert(name, stamp);
                }
                Value::Object(entries) if name == image_keys::CACHE => tree.cache.extend(entries),
                Value::Object(leaves) => {
                    match serde_json::from_value::<BTreeMap<String, CounterRecord>>(Value::Object(leaves)) {
                        Ok(records) if records.is_empty() => {}
                        Ok(records) => {
                            tree.counters.insert(GroupPath::from(name), records);
                        }
                        Err(e) => warn!(group = %name, error = %e, "unreadable group in flat image, dropping it"),
                    }
                }
                _ => debug!(key = %name, "ignoring flat image entry"),
            }
        }
        info!(
            groups = tree.group_count(),
            timestamps = tree.timestamps.len(),
            "migrated flat state image"
        );
        tree
    }

    pub fn record(&self, key: &GroupKey) -> Option<&CounterRecord> {
        self.counters.get(&key.group)?.get(&key.leaf)
    }

    pub fn counter(&self, key: &GroupKey) -> u64 {
        self.record(key).map(|r| r.counter).unwrap_or(0)
    }

    /// Leaf name -> cumulative counter for every leaf of `group`.
    pub fn group_counters(&self, group: &GroupPath) -> BTreeMap<String, u64> {
        self.counters
            .get(group)
            .map(|leaves| {
                leaves
                    .iter()
                    .map(|(leaf, rec)| (leaf.clone(), rec.counter))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn group_count(&self) -> usize {
        self.counters.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.counters.values().map(BTreeMap::len).sum()
    }
}

fn is_flat_layout(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && !map.contains_key(image_keys::COUNTERS)
        && !map.contains_key(image_keys::TIMESTAMPS)
}
