// crates/policy-probe-config/src/env.rs
// ============================================================================
// Module: Environment Overrides
// Description: Environment-variable layer of the configuration merge.
// Purpose: Apply POLICY_PROBE_* overrides on top of file and default values.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Environment variables form the highest-precedence configuration layer.
//! Overrides are applied from an explicit snapshot so loading stays
//! deterministic and testable; the process environment is only read once, at
//! snapshot time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;

use crate::config::ConfigError;
use crate::config::ReportFormat;
use crate::config::RunConfig;

// ============================================================================
// SECTION: Variables
// ============================================================================

/// Base URL override.
pub const ENV_SERVICE_URL: &str = "POLICY_PROBE_URL";
/// Bearer token override.
pub const ENV_AUTH_TOKEN: &str = "POLICY_PROBE_AUTH_TOKEN";
/// Timeout override in seconds.
pub const ENV_TIMEOUT: &str = "POLICY_PROBE_TIMEOUT";
/// Expected bundle revision override.
pub const ENV_EXPECTED_BUNDLE_REVISION: &str = "POLICY_PROBE_EXPECTED_BUNDLE_REVISION";
/// Report format override.
pub const ENV_REPORT_FORMAT: &str = "POLICY_PROBE_REPORT_FORMAT";
/// Global maximum response time override in milliseconds.
pub const ENV_MAX_RESPONSE_TIME_MS: &str = "POLICY_PROBE_MAX_RESPONSE_TIME_MS";
/// Global warning threshold override in milliseconds.
pub const ENV_WARNING_THRESHOLD_MS: &str = "POLICY_PROBE_WARNING_THRESHOLD_MS";
/// Prefix shared by every supported override variable.
const ENV_PREFIX: &str = "POLICY_PROBE_";

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Captures the `POLICY_PROBE_*` subset of the process environment.
#[must_use]
pub fn env_snapshot() -> BTreeMap<String, String> {
    env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)).collect()
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Applies environment overrides onto a merged configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when a variable value fails to parse.
pub(crate) fn apply_env_overrides(
    config: &mut RunConfig,
    env: &BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    if let Some(value) = env.get(ENV_SERVICE_URL) {
        config.service_url = value.clone();
    }
    if let Some(value) = env.get(ENV_AUTH_TOKEN) {
        config.auth_token = Some(value.clone());
    }
    if let Some(value) = parse_u64(env, ENV_TIMEOUT)? {
        config.timeout_seconds = value;
    }
    if let Some(value) = env.get(ENV_EXPECTED_BUNDLE_REVISION) {
        config.expected_bundle_revision = Some(value.clone());
    }
    if let Some(value) = env.get(ENV_REPORT_FORMAT) {
        config.report_format =
            ReportFormat::parse(value).ok_or_else(|| ConfigError::Env {
                variable: ENV_REPORT_FORMAT.to_string(),
                detail: format!("unknown report format {value}"),
            })?;
    }
    if let Some(value) = parse_u64(env, ENV_MAX_RESPONSE_TIME_MS)? {
        config.thresholds.max_response_time_ms = value;
    }
    if let Some(value) = parse_u64(env, ENV_WARNING_THRESHOLD_MS)? {
        config.thresholds.warning_threshold_ms = value;
    }
    Ok(())
}

/// Parses an unsigned integer variable when present.
fn parse_u64(env: &BTreeMap<String, String>, variable: &str) -> Result<Option<u64>, ConfigError> {
    let Some(value) = env.get(variable) else {
        return Ok(None);
    };
    value.trim().parse::<u64>().map(Some).map_err(|_| ConfigError::Env {
        variable: variable.to_string(),
        detail: format!("must be an unsigned integer, got {value}"),
    })
}
