// crates/policy-probe-core/src/case.rs
// ============================================================================
// Module: Policy Case Model
// Description: Declared decision expectations for policy checks.
// Purpose: Carry one configured input/expectation pair through a run.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`PolicyCase`] is declared by configuration and read-only during a run:
//! a decision path, an input document, the expected decision value, an
//! optional expectation on the `allow` key of object decisions, and a smoke
//! eligibility flag.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Policy Case
// ============================================================================

/// One declared decision expectation.
///
/// # Invariants
/// - `name` is unique among configured cases; validation enforces presence.
/// - `path` addresses the decision relative to the service data API root.
/// - Values are opaque JSON; the engine never interprets them beyond
///   structural comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyCase {
    /// Case name used to derive the check name.
    pub name: String,
    /// Decision path, e.g. `example/allow`.
    pub path: String,
    /// Input document posted to the decision endpoint.
    pub input: Value,
    /// Expected decision value.
    pub expected: Value,
    /// Optional expectation on the `allow` key of an object decision.
    #[serde(default)]
    pub expected_allow: Option<bool>,
    /// Marks the case as smoke-eligible.
    #[serde(default)]
    pub smoke: bool,
}
