// crates/policy-probe-runner/src/categories/auth.rs
// ============================================================================
// Module: Auth Category
// Description: Authentication enforcement checks.
// Purpose: Verify the service rejects bare requests and accepts the token.
// Dependencies: crate::category, policy-probe-client, policy-probe-core
// ============================================================================

//! ## Overview
//! These checks validate that the service *requires* authentication when a
//! token is configured: an unauthenticated request must be rejected with 401,
//! and the configured token must be accepted. Both skip when no token is
//! configured, because there is nothing to enforce. They run at the same
//! priority as health so auth failures surface before bundle and policy work.

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
// SECTION: Auth Required
// ============================================================================

/// Verifies unauthenticated requests are rejected with HTTP 401.
struct AuthRequired;

#[async_trait]
impl Check for AuthRequired {
    fn name(&self) -> &str {
        "auth_required"
    }

    fn description(&self) -> &str {
        "Verify the service rejects unauthenticated requests with HTTP 401"
    }

    async fn execute(&self, client: &ProbeClient, config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        if config.auth_token.is_none() {
            return CheckResult::new(
                self.name(),
                CheckStatus::Skip,
                started.elapsed(),
                "Skipped: no auth_token configured, authentication enforcement not tested",
            );
        }

        match client.unauthenticated_status("health").await {
            Ok((401, elapsed)) => CheckResult::new(
                self.name(),
                CheckStatus::Pass,
                elapsed,
                "Service correctly rejects unauthenticated requests (HTTP 401)",
            )
            .with_details(json!({"status_code": 401})),
            Ok((status, elapsed)) => CheckResult::new(
                self.name(),
                CheckStatus::Fail,
                elapsed,
                format!(
                    "Service did not reject unauthenticated request: expected HTTP 401, got \
                     {status}. Authentication may not be enforced."
                ),
            )
            .with_details(json!({"status_code": status})),
            Err(
                error @ ClientError::Timeout {
                    ..
                },
            ) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Request timed out while testing auth enforcement: {error}"),
            ),
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Connection error while testing auth enforcement: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Auth Token Valid
// ============================================================================

/// Verifies the configured token is accepted by the service.
///
/// Companion to [`AuthRequired`]: after confirming bare requests are
/// rejected, confirm the correct token is accepted, ruling out
/// misconfiguration on the probe side.
struct AuthTokenValid;

#[async_trait]
impl Check for AuthTokenValid {
    fn name(&self) -> &str {
        "auth_token_valid"
    }

    fn description(&self) -> &str {
        "Verify the configured auth token is accepted by the service"
    }

    async fn execute(&self, client: &ProbeClient, config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        if config.auth_token.is_none() {
            return CheckResult::new(
                self.name(),
                CheckStatus::Skip,
                started.elapsed(),
                "Skipped: no auth_token configured",
            );
        }

        match client.health().await {
            Ok((health, elapsed)) => CheckResult::new(
                self.name(),
                CheckStatus::Pass,
                elapsed,
                "Configured auth token accepted by the service",
            )
            .with_details(json!({"health_status": health.status})),
            Err(
                error @ ClientError::Http {
                    ..
                },
            ) => {
                let status_code = error.status().unwrap_or_default();
                if status_code == 401 {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        started.elapsed(),
                        "Service rejected the configured auth token with HTTP 401; check that \
                         auth_token matches the server configuration",
                    )
                    .with_details(json!({"status_code": status_code}))
                } else {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Error,
                        started.elapsed(),
                        format!("Unexpected HTTP error: {error}"),
                    )
                    .with_details(json!({"status_code": status_code}))
                }
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
// SECTION: Category
// ============================================================================

/// Authentication enforcement category.
pub struct AuthCategory;

impl AuthCategory {
    /// Builds the auth category.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for AuthCategory {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckCategory for AuthCategory {
    fn name(&self) -> &str {
        "auth"
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(AuthRequired), Box::new(AuthTokenValid)]
    }

    fn is_smoke(&self) -> bool {
        // Auth enforcement is a critical property; keep it in the smoke set.
        true
    }

    fn priority(&self) -> u32 {
        // Same priority as health; declaration order keeps health first.
        0
    }
}
