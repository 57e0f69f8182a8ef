// crates/policy-probe-core/src/lib.rs
// ============================================================================
// Module: Policy Probe Core
// Description: Value types and pure logic for probe runs.
// Purpose: Provide the result model, aggregation, and decision comparison.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This crate holds the dependency-light heart of Policy Probe: the status and
//! result model for individual checks, the pure aggregator that reduces a run
//! into one summary, structural comparison of decision values, and the
//! configuration value types (policy cases, response-time thresholds) that
//! checks read during a run. Nothing here performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod case;
pub mod compare;
pub mod result;
pub mod summary;
pub mod thresholds;

pub use case::PolicyCase;
pub use compare::decision_equals;
pub use result::CheckResult;
pub use result::CheckStatus;
pub use summary::RunSummary;
pub use summary::aggregate_results;
pub use thresholds::ThresholdOverride;
pub use thresholds::Thresholds;
