// crates/policy-probe-core/src/result.rs
// ============================================================================
// Module: Check Result Model
// Description: Status and result value types for individual checks.
// Purpose: Record one immutable outcome per executed check.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A check produces exactly one [`CheckResult`] and the result is never
//! mutated afterwards. Pass and Fail are assertion outcomes; Error denotes an
//! execution fault (network, timeout, malformed response); Skip denotes a
//! deliberately omitted check. Detail payloads are opaque JSON handed through
//! to reporters unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Outcome classification for one executed check.
///
/// # Invariants
/// - A status is assigned exactly once when the result is built.
/// - Variants are stable for reporters and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Assertion held.
    Pass,
    /// Assertion was evaluated and did not hold.
    Fail,
    /// Check was deliberately not executed.
    Skip,
    /// Execution fault before the assertion could be evaluated.
    Error,
}

impl CheckStatus {
    /// Returns the lowercase label used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Error => "error",
        }
    }

    /// Returns true when the status counts against run success.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Fail | Self::Error)
    }
}

// ============================================================================
// SECTION: Result
// ============================================================================

/// Immutable record of one check execution.
///
/// # Invariants
/// - `name` is unique within a run.
/// - `duration` covers the service round-trips of the check, including any
///   client-side retries, at sub-second resolution.
/// - No mutator exists; fields are written once by the constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Check name, unique within a run.
    pub name: String,
    /// Outcome classification.
    pub status: CheckStatus,
    /// Elapsed wall time of the unit of work.
    pub duration: Duration,
    /// Human-readable outcome message.
    pub message: String,
    /// Optional structured detail payload (e.g. expected vs. actual).
    pub details: Option<Value>,
}

impl CheckResult {
    /// Builds a result without a detail payload.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: CheckStatus,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            duration,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches a structured detail payload.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the duration in fractional milliseconds for reporting.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1_000.0
    }
}
