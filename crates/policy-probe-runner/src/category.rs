// crates/policy-probe-runner/src/category.rs
// ============================================================================
// Module: Check Abstractions
// Description: Trait seams for checks and check categories.
// Purpose: Let new categories plug in without touching the orchestrator.
// Dependencies: async-trait, policy-probe-client, policy-probe-config,
//               policy-probe-core
// ============================================================================

//! ## Overview
//! A [`Check`] carries one capability: execute against the shared client and
//! the immutable run configuration, producing exactly one result. A
//! [`CheckCategory`] groups checks in declaration order and declares smoke
//! eligibility and a priority (lower runs earlier). Both are object-safe so
//! the orchestrator works over capability sets, never concrete types.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use policy_probe_client::ProbeClient;
use policy_probe_config::RunConfig;
use policy_probe_core::CheckResult;

// ============================================================================
// SECTION: Check
// ============================================================================

/// One unit of verification work.
///
/// # Invariants
/// - `execute` is pure with respect to engine state; its only side effects
///   are requests against the external service through the client.
/// - Client errors never escape `execute`; they become Error results.
#[async_trait]
pub trait Check: Send + Sync {
    /// Returns the check name, unique within a run.
    fn name(&self) -> &str;

    /// Returns a one-line description of what the check verifies.
    fn description(&self) -> &str;

    /// Executes the check against the shared session.
    async fn execute(&self, client: &ProbeClient, config: &RunConfig) -> CheckResult;
}

// ============================================================================
// SECTION: Category
// ============================================================================

/// Ordered group of checks with scheduling metadata.
///
/// # Invariants
/// - `checks()` order is the execution order within the category.
/// - Categories are compared solely by `priority()`; ties preserve
///   declaration order through the orchestrator's stable sort.
pub trait CheckCategory: Send + Sync {
    /// Returns the category name used for selection and reporting.
    fn name(&self) -> &str;

    /// Returns the checks of this category in declaration order.
    fn checks(&self) -> Vec<Box<dyn Check>>;

    /// Returns true when the category belongs to the smoke subset.
    fn is_smoke(&self) -> bool;

    /// Returns the execution priority; lower values run earlier.
    fn priority(&self) -> u32;
}
