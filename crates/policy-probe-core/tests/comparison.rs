// crates/policy-probe-core/tests/comparison.rs
// ============================================================================
// Module: Decision Comparison Tests
// Description: Structural equality coverage for decision values.
// Purpose: Pin ordered-array and strict-object comparison semantics.
// ============================================================================

//! Structural comparison semantics for [`policy_probe_core::decision_equals`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use policy_probe_core::decision_equals;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

#[test]
fn booleans_compare_by_value() {
    assert!(decision_equals(&json!(true), &json!(true)));
    assert!(!decision_equals(&json!(true), &json!(false)));
}

#[test]
fn numbers_compare_numerically_across_representations() {
    assert!(decision_equals(&json!(1), &json!(1.0)));
    assert!(decision_equals(&json!(0), &json!(-0.0)));
    assert!(!decision_equals(&json!(1), &json!(2)));
    assert!(!decision_equals(&json!(1), &json!("1")));
}

#[test]
fn objects_require_exact_key_sets() {
    let expected = json!({"allow": true, "role": "admin"});
    assert!(decision_equals(&expected, &json!({"role": "admin", "allow": true})));
    assert!(!decision_equals(&expected, &json!({"allow": true})));
    assert!(!decision_equals(&expected, &json!({"allow": true, "role": "admin", "extra": 1})));
    assert!(!decision_equals(&expected, &json!({"allow": true, "role": "user"})));
}

#[test]
fn arrays_compare_element_by_element_in_order() {
    assert!(decision_equals(&json!(["read", "write"]), &json!(["read", "write"])));
    // Set-equal but reordered permission lists do not match; ordered
    // comparison is the declared semantics.
    assert!(!decision_equals(&json!(["read", "write"]), &json!(["write", "read"])));
    assert!(!decision_equals(&json!(["read"]), &json!(["read", "write"])));
}

#[test]
fn nested_structures_compare_recursively() {
    let expected = json!({"allow": true, "grants": [{"path": "/a", "ops": [1, 2]}]});
    let actual = json!({"allow": true, "grants": [{"path": "/a", "ops": [1, 2.0]}]});
    assert!(decision_equals(&expected, &actual));

    let reordered = json!({"allow": true, "grants": [{"path": "/a", "ops": [2, 1]}]});
    assert!(!decision_equals(&expected, &reordered));
}

#[test]
fn null_and_absent_values_are_distinct_shapes() {
    assert!(decision_equals(&Value::Null, &Value::Null));
    assert!(!decision_equals(&Value::Null, &json!(false)));
    assert!(!decision_equals(&json!({"allow": null}), &json!({})));
}

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        ".*".prop_map(Value::String),
    ];
    leaf.prop_recursive(max_depth, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4).prop_map(|map| {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key, value);
                }
                Value::Object(object)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn comparison_is_reflexive(value in json_value_strategy(3)) {
        prop_assert!(decision_equals(&value, &value));
    }

    #[test]
    fn comparison_is_symmetric(
        left in json_value_strategy(2),
        right in json_value_strategy(2),
    ) {
        prop_assert_eq!(decision_equals(&left, &right), decision_equals(&right, &left));
    }
}
