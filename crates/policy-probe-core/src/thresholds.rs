// crates/policy-probe-core/src/thresholds.rs
// ============================================================================
// Module: Response Time Thresholds
// Description: Global and per-category response-time limits.
// Purpose: Resolve effective latency thresholds for a check category.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Thresholds carry a global maximum and warning response time plus optional
//! per-category overrides. Health probes answer much faster than complex
//! decision evaluations, so per-category values allow accurate alerting
//! without false positives. Values are read-only during a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default maximum response time in milliseconds.
const DEFAULT_MAX_RESPONSE_TIME_MS: u64 = 500;
/// Default warning response time in milliseconds.
const DEFAULT_WARNING_THRESHOLD_MS: u64 = 100;

/// Returns the default maximum response time.
const fn default_max_response_time_ms() -> u64 {
    DEFAULT_MAX_RESPONSE_TIME_MS
}

/// Returns the default warning threshold.
const fn default_warning_threshold_ms() -> u64 {
    DEFAULT_WARNING_THRESHOLD_MS
}

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Partial per-category threshold override.
///
/// # Invariants
/// - Unset fields fall back to the global values during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOverride {
    /// Category-specific maximum response time in milliseconds.
    #[serde(default)]
    pub max_response_time_ms: Option<u64>,
    /// Category-specific warning threshold in milliseconds.
    #[serde(default)]
    pub warning_threshold_ms: Option<u64>,
}

/// Global response-time thresholds with per-category overrides.
///
/// # Invariants
/// - Read-only during a run.
/// - Validation guarantees `warning_threshold_ms < max_response_time_ms` both
///   globally and for every resolved category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Global maximum response time in milliseconds.
    #[serde(default = "default_max_response_time_ms")]
    pub max_response_time_ms: u64,
    /// Global warning response time in milliseconds.
    #[serde(default = "default_warning_threshold_ms")]
    pub warning_threshold_ms: u64,
    /// Per-category overrides keyed by category name.
    #[serde(default)]
    pub category_overrides: BTreeMap<String, ThresholdOverride>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_response_time_ms: DEFAULT_MAX_RESPONSE_TIME_MS,
            warning_threshold_ms: DEFAULT_WARNING_THRESHOLD_MS,
            category_overrides: BTreeMap::new(),
        }
    }
}

impl Thresholds {
    /// Resolves the effective thresholds for a category.
    ///
    /// Returns a flattened copy with the category override applied; the
    /// override map is not propagated into the resolved value.
    #[must_use]
    pub fn for_category(&self, category: &str) -> Self {
        let Some(entry) = self.category_overrides.get(category) else {
            return Self {
                max_response_time_ms: self.max_response_time_ms,
                warning_threshold_ms: self.warning_threshold_ms,
                category_overrides: BTreeMap::new(),
            };
        };
        Self {
            max_response_time_ms: entry.max_response_time_ms.unwrap_or(self.max_response_time_ms),
            warning_threshold_ms: entry
                .warning_threshold_ms
                .unwrap_or(self.warning_threshold_ms),
            category_overrides: BTreeMap::new(),
        }
    }

    /// Returns the maximum response time as a [`Duration`].
    #[must_use]
    pub const fn max_response_time(&self) -> Duration {
        Duration::from_millis(self.max_response_time_ms)
    }

    /// Returns the warning threshold as a [`Duration`].
    #[must_use]
    pub const fn warning_threshold(&self) -> Duration {
        Duration::from_millis(self.warning_threshold_ms)
    }
}
