// crates/policy-probe-runner/src/categories/bundle.rs
// ============================================================================
// Module: Bundle Category
// Description: Bundle presence, revision, and evaluability checks.
// Purpose: Verify deployed policy bundles are active and usable.
// Dependencies: crate::category, policy-probe-client, policy-probe-core
// ============================================================================

//! ## Overview
//! A bundle can be listed by the status endpoint and still be unusable, so
//! the category checks three layers: at least one bundle is loaded, active
//! revisions match the configured expectation, and the runtime policy graph
//! actually answers a minimal data query.

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
use serde_json::Value;
use serde_json::json;

use crate::category::Check;
use crate::category::CheckCategory;

// ============================================================================
// SECTION: Bundle Status
// ============================================================================

/// Verifies at least one bundle is loaded.
struct BundleStatus;

#[async_trait]
impl Check for BundleStatus {
    fn name(&self) -> &str {
        "bundle_status"
    }

    fn description(&self) -> &str {
        "Verify at least one bundle is loaded in the service"
    }

    async fn execute(&self, client: &ProbeClient, _config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        match client.bundle_status().await {
            Ok((bundles, elapsed)) => {
                if bundles.is_empty() {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        "No bundles loaded in the service",
                    )
                } else {
                    let names: Vec<&str> = bundles.keys().map(String::as_str).collect();
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Pass,
                        elapsed,
                        format!("Found {} bundle(s) loaded", bundles.len()),
                    )
                    .with_details(json!({"bundle_count": bundles.len(), "bundle_names": names}))
                }
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Failed to get bundle status: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Bundle Revision
// ============================================================================

/// Verifies every active bundle revision matches the configured expectation.
struct BundleRevision;

#[async_trait]
impl Check for BundleRevision {
    fn name(&self) -> &str {
        "bundle_revision"
    }

    fn description(&self) -> &str {
        "Verify bundle revisions match the expected version"
    }

    async fn execute(&self, client: &ProbeClient, config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        let Some(expected) = config.expected_bundle_revision.as_deref() else {
            return CheckResult::new(
                self.name(),
                CheckStatus::Skip,
                started.elapsed(),
                "No expected bundle revision configured",
            );
        };

        match client.bundle_status().await {
            Ok((bundles, elapsed)) => {
                if bundles.is_empty() {
                    return CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        "No bundles loaded to check revision",
                    );
                }
                let mismatches: Vec<String> = bundles
                    .iter()
                    .filter(|(_, state)| state.active_revision != expected)
                    .map(|(name, state)| {
                        format!("{name}: {} (expected {expected})", state.active_revision)
                    })
                    .collect();
                if mismatches.is_empty() {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Pass,
                        elapsed,
                        format!("All bundles have expected revision: {expected}"),
                    )
                    .with_details(json!({"expected_revision": expected}))
                } else {
                    CheckResult::new(
                        self.name(),
                        CheckStatus::Fail,
                        elapsed,
                        format!("Bundle revision mismatch: {}", mismatches.join(", ")),
                    )
                    .with_details(json!({"mismatches": mismatches}))
                }
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Error checking bundle revision: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Bundle Evaluability
// ============================================================================

/// Verifies the runtime policy graph answers a minimal data query.
///
/// A bundle can be present yet broken at runtime, e.g. an activation that
/// succeeded but left rules unevaluable. Reading the root data document
/// touches the compiled graph and surfaces that state.
struct BundleEvaluability;

#[async_trait]
impl Check for BundleEvaluability {
    fn name(&self) -> &str {
        "bundle_evaluability"
    }

    fn description(&self) -> &str {
        "Verify bundle policies are evaluable at runtime"
    }

    async fn execute(&self, client: &ProbeClient, _config: &RunConfig) -> CheckResult {
        let started = Instant::now();
        match client.get_data("").await {
            Ok((value, elapsed)) => {
                // An absent or empty data document is valid; what matters is
                // that the query did not fault.
                let data_keys: Vec<&str> = match value.as_ref() {
                    Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
                    _ => Vec::new(),
                };
                CheckResult::new(
                    self.name(),
                    CheckStatus::Pass,
                    elapsed,
                    "Bundle policies are evaluable",
                )
                .with_details(json!({"data_keys": data_keys}))
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
                format!("Could not reach the service to verify evaluability: {error}"),
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
                    format!(
                        "Service returned HTTP {status_code} when querying the data document; \
                         bundle policies may be broken"
                    ),
                )
                .with_details(json!({"status_code": status_code, "error": error.to_string()}))
            }
            Err(error) => CheckResult::new(
                self.name(),
                CheckStatus::Error,
                started.elapsed(),
                format!("Unexpected error during evaluability check: {error}"),
            )
            .with_details(json!({"error": error.to_string()})),
        }
    }
}

// ============================================================================
// SECTION: Category
// ============================================================================

/// Bundle verification category.
pub struct BundleCategory;

impl BundleCategory {
    /// Builds the bundle category.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BundleCategory {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckCategory for BundleCategory {
    fn name(&self) -> &str {
        "bundle"
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(BundleStatus), Box::new(BundleRevision), Box::new(BundleEvaluability)]
    }

    fn is_smoke(&self) -> bool {
        true
    }

    fn priority(&self) -> u32 {
        1
    }
}
