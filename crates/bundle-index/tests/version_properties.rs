//! Property tests for version ordering

use std::cmp::Ordering;

use bundle_index::{compare_versions, sort_versions, version::latest};
use proptest::prelude::*;

fn version_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..200, 1..5).prop_map(|segments| {
        segments
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    })
}

proptest! {
    #[test]
    fn numeric_segments_compare_numerically(major in 0u32..1000, a in 0u32..1000, b in 0u32..1000) {
        let left = format!("{major}.{a}.0");
        let right = format!("{major}.{b}.0");
        prop_assert_eq!(compare_versions(&left, &right), a.cmp(&b));
    }

    #[test]
    fn ordering_is_antisymmetric(a in version_strategy(), b in version_strategy()) {
        prop_assert_eq!(compare_versions(&a, &b), compare_versions(&b, &a).reverse());
    }

    #[test]
    fn only_identical_strings_compare_equal(a in version_strategy(), b in version_strategy()) {
        prop_assert_eq!(compare_versions(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn sorted_versions_end_with_latest(versions in prop::collection::vec(version_strategy(), 1..10)) {
        let sorted = sort_versions(versions.clone());
        let max = latest(versions.iter().map(String::as_str)).unwrap();
        prop_assert_eq!(sorted.last().map(String::as_str), Some(max));
        for pair in sorted.windows(2) {
            prop_assert_eq!(compare_versions(&pair[0], &pair[1]), Ordering::Less);
        }
    }
}

#[test]
fn latest_is_not_lexicographic() {
    let versions = ["1.9.0", "1.10.0", "2.0.0"];
    assert_eq!(latest(versions), Some("2.0.0"));
    assert_eq!(
        sort_versions(["2.0.0", "1.10.0", "1.9.0"].map(String::from)),
        vec!["1.9.0", "1.10.0", "2.0.0"]
    );
}
