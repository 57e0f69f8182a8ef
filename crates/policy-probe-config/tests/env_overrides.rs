// crates/policy-probe-config/tests/env_overrides.rs
// ============================================================================
// Module: Env Override Tests
// Description: Precedence and parsing of environment overrides.
// Purpose: Ensure env beats file, file beats defaults, bad values fail.
// ============================================================================

//! Environment-layer coverage for [`policy_probe_config::RunConfig`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::io::Write;

use policy_probe_config::ConfigError;
use policy_probe_config::ReportFormat;
use policy_probe_config::RunConfig;
use policy_probe_config::env::ENV_AUTH_TOKEN;
use policy_probe_config::env::ENV_MAX_RESPONSE_TIME_MS;
use policy_probe_config::env::ENV_REPORT_FORMAT;
use policy_probe_config::env::ENV_SERVICE_URL;
use policy_probe_config::env::ENV_TIMEOUT;
use policy_probe_config::env::ENV_WARNING_THRESHOLD_MS;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn env_of(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

#[test]
fn env_overrides_take_precedence_over_file_values() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"service_url: \"http://file.example:8181\"\ntimeout_seconds: 20\n")
        .map_err(|err| err.to_string())?;

    let env = env_of(&[
        (ENV_SERVICE_URL, "http://env.example:8181"),
        (ENV_TIMEOUT, "45"),
        (ENV_AUTH_TOKEN, "env-token"),
    ]);
    let config =
        RunConfig::load_with_env(Some(file.path()), &env).map_err(|err| err.to_string())?;
    assert_eq!(config.service_url, "http://env.example:8181");
    assert_eq!(config.timeout_seconds, 45);
    assert_eq!(config.auth_token.as_deref(), Some("env-token"));
    Ok(())
}

#[test]
fn threshold_and_format_overrides_apply_without_a_file() -> TestResult {
    let env = env_of(&[
        (ENV_MAX_RESPONSE_TIME_MS, "900"),
        (ENV_WARNING_THRESHOLD_MS, "300"),
        (ENV_REPORT_FORMAT, "json"),
    ]);
    let config = RunConfig::load_with_env(None, &env).map_err(|err| err.to_string())?;
    assert_eq!(config.thresholds.max_response_time_ms, 900);
    assert_eq!(config.thresholds.warning_threshold_ms, 300);
    assert_eq!(config.report_format, ReportFormat::Json);
    Ok(())
}

#[test]
fn non_numeric_timeout_override_names_the_variable() -> TestResult {
    let env = env_of(&[(ENV_TIMEOUT, "soon")]);
    match RunConfig::load_with_env(None, &env) {
        Err(ConfigError::Env {
            variable, ..
        }) => {
            assert_eq!(variable, ENV_TIMEOUT);
            Ok(())
        }
        Err(other) => Err(format!("expected env error, got {other}")),
        Ok(_) => Err("expected env error".to_string()),
    }
}

#[test]
fn unknown_report_format_override_is_rejected() -> TestResult {
    let env = env_of(&[(ENV_REPORT_FORMAT, "yaml")]);
    match RunConfig::load_with_env(None, &env) {
        Err(ConfigError::Env {
            variable, ..
        }) => {
            assert_eq!(variable, ENV_REPORT_FORMAT);
            Ok(())
        }
        Err(other) => Err(format!("expected env error, got {other}")),
        Ok(_) => Err("expected env error".to_string()),
    }
}

#[test]
fn merged_env_values_still_pass_validation() -> TestResult {
    // Timeout override outside the allowed bounds fails after the merge.
    let env = env_of(&[(ENV_TIMEOUT, "0")]);
    match RunConfig::load_with_env(None, &env) {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains("timeout_seconds"));
            Ok(())
        }
        Err(other) => Err(format!("expected validation error, got {other}")),
        Ok(_) => Err("expected validation error".to_string()),
    }
}
