// crates/policy-probe-config/src/lib.rs
// ============================================================================
// Module: Policy Probe Config
// Description: Run configuration loading and validation.
// Purpose: Produce one immutable, validated configuration per probe run.
// Dependencies: policy-probe-core, serde, serde_yaml, thiserror, url
// ============================================================================

//! ## Overview
//! Configuration merges three layers with fixed precedence: environment
//! variables over a YAML file over built-in defaults. Loading is strict and
//! fail-closed: size and encoding guards on the file, typed parsing, and full
//! validation before a [`RunConfig`] is handed to the orchestrator. The
//! orchestrator itself never reads files or environment variables.
//!
//! Security posture: config inputs are untrusted; limits and validation fail
//! closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

pub use config::ConfigError;
pub use config::ReportFormat;
pub use config::RunConfig;
pub use env::env_snapshot;
