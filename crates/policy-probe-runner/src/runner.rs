// crates/policy-probe-runner/src/runner.rs
// ============================================================================
// Module: Probe Orchestrator
// Description: Mode selection, ordering, fail-fast, and session lifetime.
// Purpose: Execute the selected categories against one client session.
// Dependencies: policy-probe-client, policy-probe-config, policy-probe-core,
//               thiserror, tracing
// ============================================================================

//! ## Overview
//! Three entry points share one execution core: smoke runs the smoke-eligible
//! categories and stops at the first Fail or Error result; full runs every
//! category to completion; category runs exactly one named category without
//! fail-fast. Categories execute in ascending priority with declaration order
//! breaking ties, checks in declaration order, and every check shares the one
//! client session opened for the run. The session is released on every exit
//! path, including fail-fast termination, before the summary is built. The
//! orchestrator never retries a check; retry lives inside the client for
//! transient transport faults only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use policy_probe_client::ClientError;
use policy_probe_client::ClientOptions;
use policy_probe_client::ProbeClient;
use policy_probe_config::RunConfig;
use policy_probe_core::RunSummary;
use policy_probe_core::aggregate_results;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::categories::AuthCategory;
use crate::categories::BundleCategory;
use crate::categories::HealthCategory;
use crate::categories::PerformanceCategory;
use crate::categories::PolicyCategory;
use crate::category::CheckCategory;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Run setup failure detected before any check executes.
///
/// # Invariants
/// - Never produced after the first check has run; mid-run faults become
///   Error results instead.
#[derive(Debug, Error)]
pub enum RunError {
    /// The requested category name is not registered.
    #[error("category '{name}' not found; available categories: {}", available.join(", "))]
    UnknownCategory {
        /// Requested category name.
        name: String,
        /// Registered category names in execution order.
        available: Vec<String>,
    },
    /// The client session could not be opened.
    #[error("failed to open client session: {0}")]
    Session(#[from] ClientError),
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Orchestrates check execution across categories for one configuration.
///
/// # Invariants
/// - Holds the immutable run configuration; no process-wide mutable state.
/// - Opens exactly one client session per run and shares it with every check.
pub struct ProbeRunner {
    /// Validated, immutable run configuration.
    config: RunConfig,
}

impl ProbeRunner {
    /// Builds a runner over one validated configuration.
    #[must_use]
    pub const fn new(config: RunConfig) -> Self {
        Self {
            config,
        }
    }

    /// Runs the smoke subset with fail-fast semantics.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the client session cannot be opened.
    pub async fn run_smoke(&self) -> Result<RunSummary, RunError> {
        let categories: Vec<Box<dyn CheckCategory>> =
            self.registered_categories().into_iter().filter(|c| c.is_smoke()).collect();
        self.run_categories(&categories, true).await
    }

    /// Runs every registered category to completion.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the client session cannot be opened.
    pub async fn run_full(&self) -> Result<RunSummary, RunError> {
        let categories = self.registered_categories();
        self.run_categories(&categories, false).await
    }

    /// Runs exactly one named category without fail-fast.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::UnknownCategory`] when the name is not registered,
    /// or [`RunError::Session`] when the session cannot be opened.
    pub async fn run_category(&self, name: &str) -> Result<RunSummary, RunError> {
        let categories = self.registered_categories();
        let Some(selected) = categories.iter().position(|c| c.name() == name) else {
            return Err(RunError::UnknownCategory {
                name: name.to_string(),
                available: categories.iter().map(|c| c.name().to_string()).collect(),
            });
        };
        let mut categories = categories;
        let category = categories.swap_remove(selected);
        self.run_categories(std::slice::from_ref(&category), false).await
    }

    /// Returns the registered categories in execution order.
    fn registered_categories(&self) -> Vec<Box<dyn CheckCategory>> {
        let mut categories: Vec<Box<dyn CheckCategory>> = vec![
            Box::new(HealthCategory::new()),
            Box::new(AuthCategory::new()),
            Box::new(BundleCategory::new()),
        ];
        if !self.config.policy_cases.is_empty() {
            categories.push(Box::new(PolicyCategory::new(self.config.policy_cases.clone())));
        }
        categories.push(Box::new(PerformanceCategory::new()));
        // Stable sort: ties keep declaration order.
        categories.sort_by_key(|category| category.priority());
        categories
    }

    /// Executes the selected categories against one shared session.
    async fn run_categories(
        &self,
        categories: &[Box<dyn CheckCategory>],
        fail_fast: bool,
    ) -> Result<RunSummary, RunError> {
        info!(
            categories = categories.len(),
            service_url = %self.config.service_url,
            fail_fast,
            "starting probe run"
        );
        let client = ProbeClient::new(ClientOptions {
            base_url: self.config.service_url.clone(),
            timeout: self.config.timeout(),
            auth_token: self.config.auth_token.clone(),
            max_retries: self.config.max_retries,
            base_backoff: self.config.base_backoff(),
        })?;

        let mut results = Vec::new();
        'run: for category in categories {
            info!(category = category.name(), "executing category");
            for check in category.checks() {
                debug!(
                    check = check.name(),
                    description = check.description(),
                    "executing check"
                );
                let result = check.execute(&client, &self.config).await;
                let aborts = fail_fast && result.status.is_failure();
                if result.status.is_failure() {
                    warn!(
                        check = result.name.as_str(),
                        status = result.status.as_str(),
                        message = result.message.as_str(),
                        "check did not pass"
                    );
                } else {
                    debug!(
                        check = result.name.as_str(),
                        status = result.status.as_str(),
                        "check finished"
                    );
                }
                results.push(result);
                if aborts {
                    info!("fail-fast abort: skipping remaining checks");
                    break 'run;
                }
            }
        }

        // The session ends here on every exit path, before aggregation.
        drop(client);
        Ok(aggregate_results(results))
    }
}
