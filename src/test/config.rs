use std::collections::HashMap;

use crate::config::{CapacityParams, ChoiceParams, ConfigError};
use crate::graph::CostPolicy;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn choice_params_default_when_unset() {
    let params = ChoiceParams::from_lookup(lookup(&[])).unwrap();
    assert_eq!(params.policy, CostPolicy::Quickest);
    assert_eq!(params.num_paths, 2);
}

#[test]
fn choice_params_parse_valid_values() {
    let params = ChoiceParams::from_lookup(lookup(&[
        ("CHOICE_APPROACH", "FEWEST_HOPS"),
        ("CHOICE_NUM_PATHS", "8"),
    ]))
    .unwrap();
    assert_eq!(params.policy, CostPolicy::FewestHops);
    assert_eq!(params.num_paths, 8);
}

#[test]
fn choice_params_reject_unknown_approach() {
    let err = ChoiceParams::from_lookup(lookup(&[("CHOICE_APPROACH", "SHORTEST")])).unwrap_err();
    assert!(matches!(err, ConfigError::BadApproach { .. }));
}

#[test]
fn choice_params_reject_out_of_range_paths() {
    for bad in ["0", "9", "-1", "two"] {
        let err =
            ChoiceParams::from_lookup(lookup(&[("CHOICE_NUM_PATHS", bad)])).unwrap_err();
        assert!(matches!(err, ConfigError::BadNumPaths { .. }), "{bad}");
    }
}

#[test]
fn capacity_params_default_when_unset() {
    let params = CapacityParams::from_lookup(lookup(&[])).unwrap();
    assert_eq!(params.policy, CostPolicy::Quickest);
    assert_eq!(params.num_paths, 2);
    assert_eq!(params.threshold, 0.7);
}

#[test]
fn capacity_params_parse_valid_values() {
    let params = CapacityParams::from_lookup(lookup(&[
        ("CAPACITY_APPROACH", "QUICKEST"),
        ("CAPACITY_NUM_PATHS", "1"),
        ("CAPACITY_TRESHOLD", "2.5"),
    ]))
    .unwrap();
    assert_eq!(params.policy, CostPolicy::Quickest);
    assert_eq!(params.num_paths, 1);
    assert_eq!(params.threshold, 2.5);
}

#[test]
fn capacity_params_reject_out_of_range_threshold() {
    for bad in ["0", "-0.5", "100.5", "nan", "lots"] {
        let err =
            CapacityParams::from_lookup(lookup(&[("CAPACITY_TRESHOLD", bad)])).unwrap_err();
        assert!(matches!(err, ConfigError::BadThreshold { .. }), "{bad}");
    }
}

#[test]
fn capacity_threshold_accepts_upper_bound() {
    let params =
        CapacityParams::from_lookup(lookup(&[("CAPACITY_TRESHOLD", "100")])).unwrap();
    assert_eq!(params.threshold, 100.0);
}
