//! Property-based tests for model parsing and zone/region derivation.

use cdctl::director::model::{region_of_zone, ClusterList};
use proptest::prelude::*;
use serde_json::json;

/// Generate a plausible region name, e.g. `us-central1`.
fn arb_region() -> impl Strategy<Value = String> {
    ("[a-z]{2,12}", "[a-z]{3,10}", 1u8..9).prop_map(|(geo, area, n)| format!("{geo}-{area}{n}"))
}

/// Generate a cluster name.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}[a-z0-9]".prop_map(|s| s.to_string())
}

proptest! {
    /// A zone is its region plus a single-letter suffix; deriving the region
    /// back must be exact.
    #[test]
    fn region_round_trips_through_zone(region in arb_region(), suffix in "[a-f]") {
        let zone = format!("{region}-{suffix}");
        prop_assert_eq!(region_of_zone(&zone), region.as_str());
    }

    /// Parsing a clusters envelope yields exactly the records supplied, in
    /// order, regardless of how many there are.
    #[test]
    fn cluster_list_parse_preserves_count_and_order(
        names in prop::collection::vec(arb_name(), 0..20),
        region in arb_region(),
        suffix in "[a-f]",
    ) {
        let zone = format!("{region}-{suffix}");
        let body = json!({
            "clusters": names.iter().map(|n| json!({
                "name": n,
                "compute": {"resourceRequests": [{"id": "compute", "zone": zone}]}
            })).collect::<Vec<_>>()
        });

        let list: ClusterList = serde_json::from_str(&body.to_string()).unwrap();
        prop_assert_eq!(list.clusters.len(), names.len());
        for (record, name) in list.clusters.iter().zip(&names) {
            prop_assert_eq!(record.short_name(), name.as_str());
            prop_assert_eq!(record.first_compute_zone(), Some(zone.as_str()));
        }
    }

    /// Unknown fields in a cluster record never break parsing.
    #[test]
    fn parse_tolerates_unknown_fields(name in arb_name(), extra in "[a-zA-Z]{1,12}") {
        let mut record = serde_json::Map::new();
        record.insert("name".to_string(), json!(name));
        record.insert(extra, json!({"nested": [1, 2, 3]}));
        let body = json!({ "clusters": [record] });

        let list: ClusterList = serde_json::from_str(&body.to_string()).unwrap();
        prop_assert_eq!(list.clusters.len(), 1);
    }
}
