//! counters/reconcile.rs
//! Recursive merge of a `(current, previous)` snapshot pair into the counter
//! tree.
//!
//! Both snapshots are walked in lockstep. The previous side is looked up by
//! field name under maps, by tag under keyed lists and by index under
//! positional lists. Whenever the previous side is missing or has a
//! different shape, it is treated as absent for that subtree.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::TAG_FIELD;
use crate::counters::record::CounterTree;
use crate::snapshot::{classify, tag_of, GroupPath, RawCount, Shape};
use crate::telemetry::{timed, ReconcileReport, Stage, StageTimes};
use crate::types::{Result, StateError};

/// Fold one snapshot pair for the metric family `label` into `counters`.
///
/// The root of `current` must be a mapping. A non-mapping `previous` root
/// is treated as absent.
pub fn reconcile(
    counters: &mut CounterTree,
    label: &GroupPath,
    current: &Value,
    previous: Option<&Value>,
) -> Result<ReconcileReport> {
    let Value::Object(current) = current else {
        return Err(StateError::InvalidSnapshot(format!(
            "root of '{}' is a {}, expected a map",
            label,
            classify(current).kind()
        )));
    };
    let previous = match previous {
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            debug!(group = %label, shape = classify(other).kind(), "previous root is not a map, ignoring it");
            None
        }
        None => None,
    };

    let mut walker = Reconciler {
        counters,
        report: ReconcileReport::default(),
    };
    let mut times = StageTimes::default();
    timed(&mut times, Stage::Walk, || walker.fold_map(label, current, previous));

    let mut report = walker.report;
    report.stage_times = times;
    Ok(report)
}

struct Reconciler<'t> {
    counters: &'t mut CounterTree,
    report: ReconcileReport,
}

impl Reconciler<'_> {
    fn fold_map(&mut self, group: &GroupPath, current: &Map<String, Value>, previous: Option<&Map<String, Value>>) {
        // A tagged record outside a keyed list behaves like a one-element list.
        if current.contains_key(TAG_FIELD) {
            let Some(tag) = tag_of(current) else {
                warn!(%group, "tagged record without a usable tag, skipping");
                return;
            };
            let previous = previous.filter(|p| tag_of(p).as_deref() == Some(tag.as_str()));
            self.fold_tagged(group, &tag, current, previous);
            return;
        }

        for (name, value) in current {
            self.fold_field(group, name, value, previous.and_then(|p| p.get(name)));
        }
    }

    /// Every non-tag field `f` of the record becomes leaf `tag` in group
    /// `group_f`.
    fn fold_tagged(
        &mut self,
        group: &GroupPath,
        tag: &str,
        current: &Map<String, Value>,
        previous: Option<&Map<String, Value>>,
    ) {
        for (name, value) in current.iter().filter(|(k, _)| k.as_str() != TAG_FIELD) {
            self.fold_field(&group.field(name), tag, value, previous.and_then(|p| p.get(name)));
        }
    }

    fn fold_field(&mut self, group: &GroupPath, name: &str, current: &Value, previous: Option<&Value>) {
        match classify(current) {
            Shape::Scalar(raw) => {
                let prev = match previous.map(classify) {
                    Some(Shape::Scalar(p)) => p,
                    Some(other) => {
                        debug!(%group, leaf = name, shape = other.kind(), "previous value is not a scalar, ignoring it");
                        RawCount::ZERO
                    }
                    None => RawCount::ZERO,
                };
                self.fold_leaf(group, name, raw, prev);
            }
            Shape::Map(map) => {
                self.fold_map(&group.child(name), map, previous.and_then(Value::as_object));
            }
            Shape::KeyedList(items) => {
                let list_group = group.field(name);
                let prev_items = previous.and_then(Value::as_array);
                let mut seen = BTreeSet::new();
                for item in items {
                    let Some((record, tag)) = item.as_object().and_then(|m| Some((m, tag_of(m)?))) else {
                        warn!(group = %list_group, "keyed list element without a usable tag, skipping");
                        continue;
                    };
                    if !seen.insert(tag.clone()) {
                        warn!(group = %list_group, %tag, "duplicate tag in keyed list, keeping the first element");
                        continue;
                    }
                    let prev = prev_items.and_then(|ps| find_tagged(ps, &tag));
                    self.fold_tagged(&list_group, &tag, record, prev);
                }
            }
            Shape::PositionalList(items) => {
                let list_group = group.field(name);
                let prev_items = previous.and_then(Value::as_array);
                for (idx, item) in items.iter().enumerate() {
                    let prev = prev_items.and_then(|ps| ps.get(idx));
                    self.fold_field(&list_group, &idx.to_string(), item, prev);
                }
            }
            Shape::EmptyList => self.report.add_empty_list(),
        }
    }

    fn fold_leaf(&mut self, group: &GroupPath, leaf: &str, current: RawCount, previous: RawCount) {
        if current.coerced {
            warn!(%group, leaf, window = "current", "non-numeric value coerced to 0");
        }
        if previous.coerced {
            warn!(%group, leaf, window = "previous", "non-numeric value coerced to 0");
        }

        let records = self.counters.entry(group.clone()).or_default();
        let created = !records.contains_key(leaf);
        let record = records.entry(leaf.to_string()).or_default();

        let last_current = record.current_hour_count;
        let obs = record.observe(current.value, previous.value);
        if obs.rollover {
            debug!(%group, leaf, last_current, current = current.value, "detected new hour, resetting window counts");
        }
        debug!(
            %group,
            leaf,
            current = current.value,
            previous = previous.value,
            increment = obs.increment,
            counter = record.counter,
            "folded counter"
        );

        self.report
            .add_leaf(created, obs.rollover, current.coerced || previous.coerced, obs.increment);
    }
}

fn find_tagged<'a>(items: &'a [Value], tag: &str) -> Option<&'a Map<String, Value>> {
    items
        .iter()
        .filter_map(Value::as_object)
        .find(|m| tag_of(m).as_deref() == Some(tag))
}
