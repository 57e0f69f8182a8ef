// crates/policy-probe-runner/src/categories/health.rs
// ============================================================================
// Module: Health Category
// Description: Reachability and status-document checks.
// Purpose: Verify the service answers health probes with a sane document.
// Dependencies: crate::category, policy-probe-client, policy-probe-core
// ============================================================================

//! ## Overview
//! Health runs first in every mode. A transport or timeout fault here is an
//! Error result; an HTTP error status from the health endpoint itself is a
//! Fail, because the service answered and the answer is wrong.

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
use serde_json::json;

use crate::category::Check;
use crate::category::CheckCategory;

// ============================================================================
// SECTION: Health Check
// ============================================================================

/// Verifies the health endpoint reports an `ok` status.
struct HealthCheck;

#[async_trait]
impl Check for HealthCheck {
    fn name(&self) -> &str {
        "health_check"
    }

    fn description(&self) -> &str {
        "Verify the service health endpoint reports status ok"
    }

    async fn execute(&self, client: &ProbeClient, _config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        match client.health().await {
            Ok((health, elapsed)) => {
                if health.status == "ok" {
                    CheckResult::new(self.name(), CheckStatus::Pass, elapsed, "Health check passed")
                        .with_details(json!({"status": health.status}))
                } else {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        format!("Health status is not 'ok': {}", health.status),
                    )
                    .with_details(json!({"status": health.status}))
                }
            }
            Err(
                error @ (ClientError::Connection {
                    ..
                }
                | ClientError::Timeout {
                    ..
                }),
            ) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Failed to reach the service: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
            Err(
                error @ ClientError::Http {
                    ..
                },
            ) => {
                let status_code = error.status().unwrap_or_default();
                CheckResult::new(
                    self.name(),
                    CheckStatus::Fail,
                    started.elapsed(),
                    format!("Health endpoint returned HTTP {status_code}"),
                )
                .with_details(json!({"status_code": status_code, "error": error.to_string()}))
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Unexpected error: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Health Response Validation
// ============================================================================

/// Verifies the health response carries a usable status field.
struct HealthResponseValidation;

#[async_trait]
impl Check for HealthResponseValidation {
    fn name(&self) -> &str {
        "health_response_validation"
    }

    fn description(&self) -> &str {
        "Verify the health response contains a non-empty status value"
    }

    async fn execute(&self, client: &ProbeClient, _config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        match client.health().await {
            Ok((health, elapsed)) => {
                if health.status.is_empty() {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        "Health response has an empty 'status' value",
                    )
                } else {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Pass,
                        elapsed,
                        "Health response validation passed",
                    )
                    .with_details(json!({
                        "status": health.status,
                        "uptime_seconds": health.uptime_seconds,
                    }))
                }
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Error validating health response: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Category
// ============================================================================

/// Health check category; highest priority, always in the smoke subset.
pub struct HealthCategory;

impl HealthCategory {
    /// Builds the health category.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HealthCategory {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckCategory for HealthCategory {
    fn name(&self) -> &str {
        "health"
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(HealthCheck), Box::new(HealthResponseValidation)]
    }

    fn is_smoke(&self) -> bool {
        true
    }

    fn priority(&self) -> u32 {
        0
    }
}
