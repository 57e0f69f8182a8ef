// crates/policy-probe-core/tests/thresholds.rs
// ============================================================================
// Module: Threshold Resolution Tests
// Description: Per-category threshold override resolution.
// Purpose: Ensure overrides flatten correctly and defaults hold.
// ============================================================================

//! Resolution semantics for [`policy_probe_core::Thresholds`].

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

use std::collections::BTreeMap;
use std::time::Duration;

use policy_probe_core::ThresholdOverride;
use policy_probe_core::Thresholds;

#[test]
fn defaults_are_global_limits() {
    let thresholds = Thresholds::default();
    assert_eq!(thresholds.max_response_time_ms, 500);
    assert_eq!(thresholds.warning_threshold_ms, 100);
    assert!(thresholds.category_overrides.is_empty());
}

#[test]
fn unknown_category_resolves_to_global_values() {
    let thresholds = Thresholds::default();
    let resolved = thresholds.for_category("policy");
    assert_eq!(resolved.max_response_time_ms, 500);
    assert_eq!(resolved.warning_threshold_ms, 100);
}

#[test]
fn override_replaces_only_set_fields() {
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "health".to_string(),
        ThresholdOverride {
            max_response_time_ms: Some(50),
            warning_threshold_ms: None,
        },
    );
    let thresholds = Thresholds {
        max_response_time_ms: 500,
        warning_threshold_ms: 100,
        category_overrides: overrides,
    };

    let resolved = thresholds.for_category("health");
    assert_eq!(resolved.max_response_time_ms, 50);
    assert_eq!(resolved.warning_threshold_ms, 100);
    // Nested overrides never propagate into a resolved value.
    assert!(resolved.category_overrides.is_empty());
}

#[test]
fn durations_convert_from_milliseconds() {
    let thresholds = Thresholds::default();
    assert_eq!(thresholds.max_response_time(), Duration::from_millis(500));
    assert_eq!(thresholds.warning_threshold(), Duration::from_millis(100));
}
