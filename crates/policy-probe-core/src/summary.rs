// crates/policy-probe-core/src/summary.rs
// ============================================================================
// Module: Run Summary Aggregation
// Description: Pure reduction of check results into one run summary.
// Purpose: Produce order-preserving summaries with order-insensitive counts.
// Dependencies: crate::result
// ============================================================================

//! ## Overview
//! The aggregator is a pure function: it takes the ordered results of one run
//! and returns a [`RunSummary`]. Counts and the success flag are insensitive
//! to result order; the original order is preserved for reporting. The total
//! duration is the sum of each result's recorded duration, so it reflects
//! service round-trips rather than orchestration overhead or the run's wall
//! clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::result::CheckResult;
use crate::result::CheckStatus;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregated outcome of one probe run.
///
/// # Invariants
/// - Built exactly once per run by [`aggregate_results`]; never mutated.
/// - Counts equal the partition of `results` by status.
/// - `results` preserves execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Total number of executed (or skipped) checks.
    pub total: usize,
    /// Number of results with status Pass.
    pub passed: usize,
    /// Number of results with status Fail.
    pub failed: usize,
    /// Number of results with status Skip.
    pub skipped: usize,
    /// Number of results with status Error.
    pub errors: usize,
    /// Sum of per-result durations.
    pub duration: Duration,
    /// Ordered sequence of results as executed.
    pub results: Vec<CheckResult>,
}

impl RunSummary {
    /// Returns true when no result failed or errored.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Returns the total duration in fractional seconds for reporting.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Reduces the ordered results of one run into a summary.
#[must_use]
pub fn aggregate_results(results: Vec<CheckResult>) -> RunSummary {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;
    let mut errors = 0usize;
    let mut duration = Duration::ZERO;
    for result in &results {
        match result.status {
            CheckStatus::Pass => passed += 1,
            CheckStatus::Fail => failed += 1,
            CheckStatus::Skip => skipped += 1,
            CheckStatus::Error => errors += 1,
        }
        duration = duration.saturating_add(result.duration);
    }
    RunSummary {
        total: results.len(),
        passed,
        failed,
        skipped,
        errors,
        duration,
        results,
    }
}
