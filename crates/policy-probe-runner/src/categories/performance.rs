// crates/policy-probe-runner/src/categories/performance.rs
// ============================================================================
// Module: Performance Category
// Description: Response-time checks against configured thresholds.
// Purpose: Surface slow health and decision round-trips as failures.
// Dependencies: crate::category, policy-probe-client, policy-probe-core
// ============================================================================

//! ## Overview
//! Latency checks compare observed round-trip time to the thresholds resolved
//! for this category. Above the maximum is a Fail; between warning and
//! maximum is a Pass whose message flags the slowness. The category never
//! joins the smoke subset: latency noise must not abort a fail-fast run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use policy_probe_client::ProbeClient;
use policy_probe_config::RunConfig;
use policy_probe_core::CheckResult;
use policy_probe_core::CheckStatus;
use policy_probe_core::Thresholds;
use serde_json::json;

use crate::category::Check;
use crate::category::CheckCategory;

/// Category name used for threshold resolution.
const CATEGORY_NAME: &str = "performance";

// ============================================================================
// SECTION: Threshold Evaluation
// ============================================================================

/// Classifies an observed round-trip against resolved thresholds.
fn classify_latency(
    name: &str,
    operation: &str,
    elapsed: Duration,
    thresholds: &Thresholds,
) -> CheckResult {
    let elapsed_ms = elapsed.as_secs_f64() * 1_000.0;
    let details = json!({
        "elapsed_ms": elapsed_ms,
        "warning_threshold_ms": thresholds.warning_threshold_ms,
        "max_response_time_ms": thresholds.max_response_time_ms,
    });
    if elapsed > thresholds.max_response_time() {
        CheckResult::new(
            name,
            CheckStatus::Fail,
            elapsed,
            format!(
                "{operation} took {elapsed_ms:.1}ms, above the {}ms maximum",
                thresholds.max_response_time_ms
            ),
        )
        .with_details(details)
    } else if elapsed > thresholds.warning_threshold() {
        CheckResult::new(
            name,
            CheckStatus::Pass,
            elapsed,
            format!(
                "{operation} took {elapsed_ms:.1}ms, above the {}ms warning threshold",
                thresholds.warning_threshold_ms
            ),
        )
        .with_details(details)
    } else {
        CheckResult::new(
            name,
            CheckStatus::Pass,
            elapsed,
            format!("{operation} took {elapsed_ms:.1}ms"),
        )
        .with_details(details)
    }
}

// ============================================================================
// SECTION: Health Latency
// ============================================================================

/// Measures the health endpoint round-trip.
struct HealthLatency;

#[async_trait]
impl Check for HealthLatency {
    fn name(&self) -> &str {
        "health_latency"
    }

    fn description(&self) -> &str {
        "Verify the health round-trip stays within configured thresholds"
    }

    async fn execute(&self, client: &ProbeClient, config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        let thresholds = config.thresholds.for_category(CATEGORY_NAME);
        match client.health().await {
            Ok((_, elapsed)) => {
                classify_latency(self.name(), "Health probe", elapsed, &thresholds)
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Could not measure health latency: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Decision Latency
// ============================================================================

/// Measures a decision evaluation round-trip using the first declared case.
struct DecisionLatency;

#[async_trait]
impl Check for DecisionLatency {
    fn name(&self) -> &str {
        "decision_latency"
    }

    fn description(&self) -> &str {
        "Verify a decision round-trip stays within configured thresholds"
    }

    async fn execute(&self, client: &ProbeClient, config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        let Some(case) = config.policy_cases.first() else {
            return CheckResult::new(
                self.name(),
                CheckStatus::Skip,
                started.elapsed(),
                "No policy cases configured to measure decision latency",
            );
        };
        let thresholds = config.thresholds.for_category(CATEGORY_NAME);
        match client.evaluate_decision(&case.path, &case.input).await {
            Ok((_, elapsed)) => {
                classify_latency(self.name(), "Decision evaluation", elapsed, &thresholds)
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Could not measure decision latency: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Category
// ============================================================================

/// Response-time verification category; excluded from smoke runs.
pub struct PerformanceCategory;

impl PerformanceCategory {
    /// Builds the performance category.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PerformanceCategory {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckCategory for PerformanceCategory {
    fn name(&self) -> &str {
        CATEGORY_NAME
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(HealthLatency), Box::new(DecisionLatency)]
    }

    fn is_smoke(&self) -> bool {
        false
    }

    fn priority(&self) -> u32 {
        3
    }
}
