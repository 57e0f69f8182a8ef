// crates/policy-probe-core/src/compare.rs
// ============================================================================
// Module: Decision Comparison
// Description: Structural equality for decision values.
// Purpose: Decide whether an observed decision matches the declared one.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A decision check passes when the service's returned value is structurally
//! equal to the declared expectation: booleans, strings, and null compare by
//! value; numbers compare numerically so integer and float spellings of the
//! same value agree; objects compare key-for-key with no tolerance for extra
//! or missing keys; arrays compare element-by-element in declared order.
//! Array order is significant on purpose, even for decisions that are
//! naturally sets.
//!
//! Security posture: decision values are untrusted service output; comparison
//! never allocates beyond recursion and never interprets payload contents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// Returns true when the observed decision structurally equals the expected
/// one.
#[must_use]
pub fn decision_equals(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left.iter().zip(right.iter()).all(|(l, r)| decision_equals(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, value)| {
                    right.get(key).is_some_and(|other| decision_equals(value, other))
                })
        }
        _ => expected == actual,
    }
}

/// Compares two JSON numbers numerically rather than by representation.
fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
        return l == r;
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}
