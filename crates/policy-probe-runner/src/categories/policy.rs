// crates/policy-probe-runner/src/categories/policy.rs
// ============================================================================
// Module: Policy Category
// Description: Declared decision expectations evaluated against the service.
// Purpose: Verify the engine returns the configured decision values.
// Dependencies: crate::category, policy-probe-client, policy-probe-core
// ============================================================================

//! ## Overview
//! One check per configured [`PolicyCase`]. A mismatching decision is a Fail
//! result carrying expected and actual values; an engine-side evaluation
//! failure or transport fault is an Error result. A decision is compared
//! structurally: exact key sets for objects, element order for arrays.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use async_trait::async_trait;
use policy_probe_client::ClientError;
use policy_probe_client::ProbeClient;
use policy_probe_config::RunConfig;
use policy_probe_core::CheckResult;
use policy_probe_core::CheckStatus;
use policy_probe_core::PolicyCase;
use policy_probe_core::decision_equals;
use serde_json::Value;
use serde_json::json;

use crate::category::Check;
use crate::category::CheckCategory;

// ============================================================================
// SECTION: Decision Check
// ============================================================================

/// Verifies one declared decision expectation.
struct DecisionCheck {
    /// Derived check name (`policy_<case>`).
    name: String,
    /// Human-readable description naming the decision path.
    description: String,
    /// The declared case under verification.
    case: PolicyCase,
}

impl DecisionCheck {
    /// Builds the check for one declared case.
    fn new(case: PolicyCase) -> Self {
        Self {
            name: format!("policy_{}", case.name),
            description: format!("Test decision {} with case {}", case.path, case.name),
            case,
        }
    }
}

#[async_trait]
impl Check for DecisionCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, client: &ProbeClient, _config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        match client.evaluate_decision(&self.case.path, &self.case.input).await {
            Ok((outcome, elapsed)) => {
                let Some(actual) = outcome.result else {
                    return CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        "Decision is undefined: response carries no result",
                    )
                    .with_details(json!({
                        "expected": self.case.expected,
                        "actual": Value::Null,
                        "policy_path": self.case.path,
                        "input": self.case.input,
                    }));
                };

                if !decision_equals(&self.case.expected, &actual) {
                    return CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        "Decision mismatch",
                    )
                    .with_details(json!({
                        "expected": self.case.expected,
                        "actual": actual,
                        "policy_path": self.case.path,
                        "input": self.case.input,
                    }));
                }

                if let Some(expected_allow) = self.case.expected_allow {
                    let actual_allow = actual.get("allow").and_then(Value::as_bool);
                    if actual_allow != Some(expected_allow) {
                        return CheckResult::new(
                            self.name(),
                            CheckStatus::Fail,
                            elapsed,
                            format!(
                                "Allow field mismatch: expected {expected_allow}, got \
                                 {actual_allow:?}"
                            ),
                        )
                        .with_details(json!({
                            "expected_allow": expected_allow,
                            "actual_allow": actual_allow,
                            "result": actual,
                        }));
                    }
                }

                CheckResult::new(
                    self.name(),
                    CheckStatus::Pass,
                    elapsed,
                    "Decision matches expected output",
                )
                .with_details(json!({"result": actual, "policy_path": self.case.path}))
            }
            Err(
                error @ ClientError::Policy {
                    ..
                },
            ) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Decision evaluation failed: {error}"),
            )
            .with_details(json!({"error": error.to_string(), "policy_path": self.case.path})),
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Failed to evaluate decision: {error}"),
            )
            .with_details(json!({"error": error.to_string(), "policy_path": self.case.path})),
        }
    }
}

// ============================================================================
// SECTION: Category
// ============================================================================

/// Declared-decision category built from the configured cases.
pub struct PolicyCategory {
    /// Cases in declaration order.
    cases: Vec<PolicyCase>,
}

impl PolicyCategory {
    /// Builds the category from the configured cases.
    #[must_use]
    pub const fn new(cases: Vec<PolicyCase>) -> Self {
        Self {
            cases,
        }
    }
}

impl CheckCategory for PolicyCategory {
    fn name(&self) -> &str {
        "policy"
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        self.cases
            .iter()
            .cloned()
            .map(|case| Box::new(DecisionCheck::new(case)) as Box<dyn Check>)
            .collect()
    }

    fn is_smoke(&self) -> bool {
        // Smoke-eligible when any case opts in; the first case counts by
        // default so a configured suite always has one smoke decision.
        self.cases.iter().enumerate().any(|(index, case)| case.smoke || index == 0)
    }

    fn priority(&self) -> u32 {
        2
    }
}
