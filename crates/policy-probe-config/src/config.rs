// crates/policy-probe-config/src/config.rs
// ============================================================================
// Module: Run Configuration
// Description: Configuration model, YAML loading, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: policy-probe-core, serde, serde_yaml, url
// ============================================================================

//! ## Overview
//! The configuration file is YAML with strict size and encoding limits.
//! Environment overrides are applied after the file layer, then the merged
//! value is validated as a whole. Missing or invalid configuration fails
//! closed; partial configs never reach the orchestrator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use policy_probe_core::PolicyCase;
use policy_probe_core::Thresholds;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::env::apply_env_overrides;
use crate::env::env_snapshot;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total config path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum allowed request timeout in seconds.
const MIN_TIMEOUT_SECONDS: u64 = 1;
/// Maximum allowed request timeout in seconds.
const MAX_TIMEOUT_SECONDS: u64 = 300;
/// Maximum allowed retry budget.
const MAX_RETRY_BUDGET: u32 = 10;

/// Returns the default service URL.
fn default_service_url() -> String {
    "http://localhost:8181".to_string()
}

/// Returns the default request timeout in seconds.
const fn default_timeout_seconds() -> u64 {
    10
}

/// Returns the default retry budget.
const fn default_max_retries() -> u32 {
    3
}

/// Returns the default base backoff in milliseconds.
const fn default_base_backoff_ms() -> u64 {
    500
}

// ============================================================================
// SECTION: Report Format
// ============================================================================

/// Output rendering selected for the run.
///
/// # Invariants
/// - Labels are stable for config files, env overrides, and CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Human-readable colored console report.
    #[default]
    Console,
    /// Machine-readable JSON report.
    Json,
    /// JUnit XML report for CI ingestion.
    Junit,
}

impl ReportFormat {
    /// Parses a report format label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "console" => Some(Self::Console),
            "json" => Some(Self::Json),
            "junit" => Some(Self::Junit),
            _ => None,
        }
    }

    /// Returns the stable label for the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Json => "json",
            Self::Junit => "junit",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation failure.
///
/// # Invariants
/// - Raised before any check executes; never converted into a check result.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem failure while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// YAML parse failure.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Environment variable override failure.
    #[error("invalid environment override {variable}: {detail}")]
    Env {
        /// Offending variable name.
        variable: String,
        /// Failure description.
        detail: String,
    },
}

// ============================================================================
// SECTION: Run Configuration
// ============================================================================

/// Immutable configuration for one probe run.
///
/// # Invariants
/// - Constructed and validated before the run; read-only afterwards.
/// - Every field has passed [`RunConfig::validate`] when produced by `load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base URL of the decision service under probe.
    #[serde(default = "default_service_url")]
    pub service_url: String,
    /// Optional bearer token; absence omits the Authorization header.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Retry budget for transient statuses, after the initial attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff delay between retries in milliseconds.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// Expected active bundle revision; unset skips the revision check.
    #[serde(default)]
    pub expected_bundle_revision: Option<String>,
    /// Declared policy cases.
    #[serde(default)]
    pub policy_cases: Vec<PolicyCase>,
    /// Response-time thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Selected report rendering.
    #[serde(default)]
    pub report_format: ReportFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            auth_token: None,
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            expected_bundle_revision: None,
            policy_cases: Vec::new(),
            thresholds: Thresholds::default(),
            report_format: ReportFormat::Console,
        }
    }
}

impl RunConfig {
    /// Loads configuration from the optional file path and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, &env_snapshot())
    }

    /// Loads configuration from the optional file path and an explicit
    /// environment snapshot.
    ///
    /// Precedence, highest first: environment, file, defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load_with_env(
        path: Option<&Path>,
        env: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        apply_env_overrides(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the YAML config file under strict guards.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        serde_yaml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the merged configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_service_url(&self.service_url)?;
        if self.timeout_seconds < MIN_TIMEOUT_SECONDS || self.timeout_seconds > MAX_TIMEOUT_SECONDS
        {
            return Err(ConfigError::Invalid(format!(
                "timeout_seconds must be within {MIN_TIMEOUT_SECONDS}..={MAX_TIMEOUT_SECONDS}: {}",
                self.timeout_seconds
            )));
        }
        if self.max_retries > MAX_RETRY_BUDGET {
            return Err(ConfigError::Invalid(format!(
                "max_retries must be at most {MAX_RETRY_BUDGET}: {}",
                self.max_retries
            )));
        }
        if self.base_backoff_ms == 0 {
            return Err(ConfigError::Invalid("base_backoff_ms must be positive".to_string()));
        }
        validate_thresholds(&self.thresholds)?;
        validate_policy_cases(&self.policy_cases)?;
        Ok(())
    }

    /// Returns the per-attempt timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Returns the base backoff as a [`Duration`].
    #[must_use]
    pub const fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Validates the service URL shape.
fn validate_service_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|err| ConfigError::Invalid(format!("service_url is not a valid url: {err}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid(format!(
            "service_url must start with http:// or https://: {raw}"
        )));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid(format!("service_url has no hostname: {raw}")));
    }
    Ok(())
}

/// Validates the global thresholds and every per-category resolution.
fn validate_thresholds(thresholds: &Thresholds) -> Result<(), ConfigError> {
    if thresholds.max_response_time_ms == 0 {
        return Err(ConfigError::Invalid(
            "thresholds.max_response_time_ms must be positive".to_string(),
        ));
    }
    if thresholds.warning_threshold_ms == 0 {
        return Err(ConfigError::Invalid(
            "thresholds.warning_threshold_ms must be positive".to_string(),
        ));
    }
    if thresholds.warning_threshold_ms >= thresholds.max_response_time_ms {
        return Err(ConfigError::Invalid(
            "thresholds.warning_threshold_ms must be less than max_response_time_ms".to_string(),
        ));
    }
    for category in thresholds.category_overrides.keys() {
        let resolved = thresholds.for_category(category);
        if resolved.max_response_time_ms == 0 || resolved.warning_threshold_ms == 0 {
            return Err(ConfigError::Invalid(format!(
                "thresholds for category {category} must be positive"
            )));
        }
        if resolved.warning_threshold_ms >= resolved.max_response_time_ms {
            return Err(ConfigError::Invalid(format!(
                "thresholds for category {category}: warning_threshold_ms must be less than \
                 max_response_time_ms"
            )));
        }
    }
    Ok(())
}

/// Validates policy case completeness and name uniqueness.
fn validate_policy_cases(cases: &[PolicyCase]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for (index, case) in cases.iter().enumerate() {
        if case.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("policy case {index} is missing a name")));
        }
        if case.path.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "policy case {} is missing a decision path",
                case.name
            )));
        }
        if !seen.insert(case.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "policy case name {} is declared more than once",
                case.name
            )));
        }
    }
    Ok(())
}
