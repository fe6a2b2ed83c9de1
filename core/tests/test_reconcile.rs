#[cfg(test)]
mod reconcile_tests {
    use serde_json::{json, Value};

    use hourly_counter_core::counters::CounterRecord;
    use hourly_counter_core::snapshot::{GroupKey, GroupPath};
    use hourly_counter_core::store::StateStore;

    fn metric(v: u64) -> Value {
        json!({ "metric1": v })
    }

    fn record(store: &StateStore) -> CounterRecord {
        *store
            .record(&GroupKey::new("serviceA", "metric1"))
            .expect("record exists")
    }

    #[test]
    fn test_first_observation_adds_both_windows() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(5), Some(&metric(3))).unwrap();

        assert_eq!(
            record(&store),
            CounterRecord { counter: 8, current_hour_count: 5, previous_hour_count: 3, deficit: 0 }
        );
    }

    #[test]
    fn test_steady_accumulation_within_an_hour() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(5), Some(&metric(3))).unwrap();
        store.update("serviceA", &metric(7), Some(&metric(4))).unwrap();

        let rec = record(&store);
        assert_eq!(rec.counter, 7 + 4);
        assert_eq!(rec.current_hour_count, 7);
        assert_eq!(rec.previous_hour_count, 4);
    }

    #[test]
    fn test_rollover_folds_closing_value_once() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(5), Some(&metric(3))).unwrap();
        let report = store.update("serviceA", &metric(2), Some(&metric(6))).unwrap();

        assert_eq!(report.rollovers, 1);
        assert_eq!(
            record(&store),
            CounterRecord { counter: 5 + 3 + 2 + 1, current_hour_count: 2, previous_hour_count: 6, deficit: 0 }
        );
    }

    #[test]
    fn test_absent_previous_then_rollover() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(5), None).unwrap();
        assert_eq!(record(&store).counter, 5);

        store.update("serviceA", &metric(2), Some(&metric(6))).unwrap();
        let rec = record(&store);
        assert_eq!(rec.counter, 5 + 2 + 1);
        assert_eq!(rec.current_hour_count, 2);
        assert_eq!(rec.previous_hour_count, 6);
    }

    #[test]
    fn test_stale_previous_across_hour_boundary_counts_once() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(5), Some(&metric(3))).unwrap();
        // New hour, but the previous window has not caught up yet.
        let report = store.update("serviceA", &metric(1), Some(&metric(3))).unwrap();
        assert_eq!(report.increment, 0);
        assert_eq!(record(&store).counter, 8);

        store.update("serviceA", &metric(4), Some(&metric(6))).unwrap();
        assert_eq!(record(&store).counter, 13);
        assert_eq!(record(&store).deficit, 0);
    }

    #[test]
    fn test_missing_previous_for_one_cycle_is_not_double_counted() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(100), Some(&metric(500))).unwrap();
        store.update("serviceA", &metric(110), None).unwrap();
        assert_eq!(record(&store).counter, 600);

        store.update("serviceA", &metric(120), Some(&metric(500))).unwrap();
        assert_eq!(record(&store).counter, 620);
    }

    #[test]
    fn test_duplicate_tag_resend_adds_zero() {
        let mut store = StateStore::in_memory();
        let snapshot = json!({"countryMap": [
            {"key": "US", "requests": 5},
            {"key": "US", "requests": 2}
        ]});
        let g = GroupPath::from("z_countryMap_requests");

        store.update("z", &snapshot, None).unwrap();
        assert_eq!(store.group_counters(&g).get("US"), Some(&5));

        let report = store.update("z", &snapshot, None).unwrap();
        assert_eq!(report.increment, 0);
        assert_eq!(store.group_counters(&g).get("US"), Some(&5));
    }

    #[test]
    fn test_identical_resend_adds_zero() {
        let mut store = StateStore::in_memory();
        store.update("serviceA", &metric(9), Some(&metric(4))).unwrap();
        let report = store.update("serviceA", &metric(9), Some(&metric(4))).unwrap();

        assert_eq!(report.increment, 0);
        assert_eq!(record(&store).counter, 13);
    }

    #[test]
    fn test_empty_list_is_a_no_op() {
        let mut store = StateStore::in_memory();
        let first = json!({"statusMap": [{"key": "200", "requests": 10}]});
        store.update("z", &first, None).unwrap();
        let before = store.tree().clone();

        let report = store.update("z", &json!({"statusMap": []}), Some(&first)).unwrap();
        assert_eq!(report.leaves, 0);
        assert_eq!(store.tree(), &before);
    }

    #[test]
    fn test_http_request_sums_breakdown_groups() {
        let mut store = StateStore::in_memory();
        let label = "httpRequests1hGroupsSums_zone1";

        let current = json!({
            "requests": 120,
            "cachedRequests": 40,
            "browserMap": [
                {"key": "Chrome", "pageViews": 30},
                {"key": "Firefox", "pageViews": 5}
            ],
            "countryMap": [
                {"key": "US", "requests": 80, "threats": 1},
                {"key": "DE", "requests": 40, "threats": 0}
            ],
            "responseStatusMap": [
                {"key": 200, "requests": 110},
                {"key": 404, "requests": 10}
            ]
        });
        let previous = json!({
            "requests": 300,
            "cachedRequests": 90,
            "browserMap": [{"key": "Firefox", "pageViews": 11}],
            "countryMap": [
                {"key": "DE", "requests": 100, "threats": 2},
                {"key": "US", "requests": 200, "threats": 0}
            ],
            "responseStatusMap": [{"key": 200, "requests": 290}]
        });
        store.update(label, &current, Some(&previous)).unwrap();

        assert_eq!(store.counter_at(label, "requests"), 420);
        assert_eq!(store.counter_at(label, "cachedRequests"), 130);

        let base = GroupPath::root(label);
        let browsers = store.group_counters(&base.field("browserMap").field("pageViews"));
        assert_eq!(browsers.get("Chrome"), Some(&30));
        assert_eq!(browsers.get("Firefox"), Some(&16));

        let countries = store.group_counters(&base.field("countryMap").field("requests"));
        assert_eq!(countries.get("US"), Some(&280));
        assert_eq!(countries.get("DE"), Some(&140));

        let threats = store.group_counters(&base.field("countryMap").field("threats"));
        assert_eq!(threats.get("DE"), Some(&2));

        let status = store.group_counters(&GroupPath::from(
            "httpRequests1hGroupsSums_zone1_responseStatusMap_requests",
        ));
        assert_eq!(status.get("200"), Some(&400));
        assert_eq!(status.get("404"), Some(&10));
    }

    #[test]
    fn test_reordered_keyed_list_still_pairs_by_tag() {
        let mut store = StateStore::in_memory();
        let cur = json!({"countryMap": [{"key": "US", "requests": 1}, {"key": "DE", "requests": 2}]});
        let prev = json!({"countryMap": [{"key": "DE", "requests": 20}, {"key": "US", "requests": 10}]});
        store.update("z", &cur, Some(&prev)).unwrap();

        let g = GroupPath::from("z_countryMap_requests");
        assert_eq!(store.group_counters(&g).get("US"), Some(&11));
        assert_eq!(store.group_counters(&g).get("DE"), Some(&22));
    }

    #[test]
    fn test_non_map_root_is_rejected_without_mutation() {
        let mut store = StateStore::in_memory();
        assert!(store.update("z", &json!(5), None).is_err());
        assert_eq!(store.tree().group_count(), 0);
    }
}
