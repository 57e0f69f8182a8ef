// crates/policy-probe-runner/src/lib.rs
// ============================================================================
// Module: Policy Probe Runner
// Description: Check abstractions, built-in categories, and orchestration.
// Purpose: Select, order, and execute checks against one client session.
// Dependencies: async-trait, policy-probe-client, policy-probe-config,
//               policy-probe-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! The runner owns the execution semantics of a probe run: categories are
//! selected for the requested mode, ordered by priority (declaration order
//! breaks ties), and their checks execute strictly sequentially against one
//! shared client session. Smoke runs stop at the first non-passing result;
//! full and single-category runs never abort early. Client faults are
//! converted into Error results at the check boundary and never propagate
//! further up.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod categories;
pub mod category;
pub mod runner;

pub use category::Check;
pub use category::CheckCategory;
pub use runner::ProbeRunner;
pub use runner::RunError;
