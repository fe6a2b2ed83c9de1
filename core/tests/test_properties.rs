#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use serde_json::json;

    use hourly_counter_core::counters::CounterRecord;
    use hourly_counter_core::store::{load_tree, save_tree, StateStore, StateTree};

    fn window() -> impl Strategy<Value = (u64, Option<u64>)> {
        (0u64..10_000, proptest::option::of(0u64..10_000))
    }

    proptest! {
        // Cumulative value never goes down, whatever upstream sends.
        #[test]
        fn prop_counter_is_monotonic(seq in proptest::collection::vec(window(), 1..40)) {
            let mut record = CounterRecord::default();
            let mut last = 0u64;
            for (cur, prev) in seq {
                record.observe(cur, prev.unwrap_or(0));
                prop_assert!(record.counter >= last);
                prop_assert_eq!(record.current_hour_count, cur);
                prop_assert_eq!(record.previous_hour_count, prev.unwrap_or(0));
                last = record.counter;
            }
        }

        // Shrinkage is carried, not dropped: counter minus deficit always
        // equals the plain signed sum of window deltas.
        #[test]
        fn prop_counter_tracks_exact_sum(seq in proptest::collection::vec(window(), 1..40)) {
            let mut record = CounterRecord::default();
            let mut exact: i128 = 0;
            for (cur, prev) in seq {
                let prev = prev.unwrap_or(0);
                let (mut last_cur, mut last_prev) = (record.current_hour_count, record.previous_hour_count);
                if cur < last_cur {
                    last_prev = last_cur;
                    last_cur = 0;
                }
                exact += (i128::from(cur) - i128::from(last_cur)) + (i128::from(prev) - i128::from(last_prev));

                record.observe(cur, prev);
                prop_assert_eq!(i128::from(record.counter) - i128::from(record.deficit), exact);
            }
        }

        #[test]
        fn prop_resend_adds_zero(seq in proptest::collection::vec(window(), 1..20)) {
            let mut store = StateStore::in_memory();
            for (cur, prev) in seq {
                let current = json!({"n": cur});
                let previous = prev.map(|p| json!({"n": p}));
                store.update("g", &current, previous.as_ref()).unwrap();
                let before = store.counter_at("g", "n");

                let report = store.update("g", &current, previous.as_ref()).unwrap();
                prop_assert_eq!(report.increment, 0);
                prop_assert_eq!(store.counter_at("g", "n"), before);
            }
        }

        #[test]
        fn prop_image_round_trips(
            leaves in proptest::collection::btree_map("[a-z]{1,6}", (0u64..1000, 0u64..1000), 0..12),
            stamps in proptest::collection::btree_map("[a-z_]{1,8}", "[0-9T:Z-]{4,20}", 0..4),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");

            let mut tree = StateTree::default();
            for (leaf, (cur, prev)) in &leaves {
                tree.counters
                    .entry("g/sub".into())
                    .or_default()
                    .entry(leaf.clone())
                    .or_default()
                    .observe(*cur, *prev);
            }
            tree.timestamps = stamps;
            save_tree(&path, &tree).unwrap();

            prop_assert_eq!(load_tree(&path), tree);
        }
    }
}
