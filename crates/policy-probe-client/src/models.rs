// crates/policy-probe-client/src/models.rs
// ============================================================================
// Module: Service Wire Models
// Description: Typed views of the decision service's response documents.
// Purpose: Parse health, bundle-status, and decision payloads leniently.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Wire models mirror the service's JSON documents. Parsing is lenient on
//! optional fields so older service versions remain probe-able; values are
//! untrusted and handed through without normalization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Health
// ============================================================================

/// Status document returned by the health endpoint.
///
/// # Invariants
/// - `status` defaults to `ok` when the service omits the field, matching
///   engines that answer health probes with an empty 200 body.
/// - `raw` carries the unmodified response document for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// Reported status string.
    pub status: String,
    /// Optional uptime in seconds.
    pub uptime_seconds: Option<u64>,
    /// Optional embedded bundle status document.
    pub bundle_status: Option<Value>,
    /// Raw response document.
    pub raw: Value,
}

impl HealthStatus {
    /// Builds a health view from a raw status document.
    #[must_use]
    pub fn from_document(raw: Value) -> Self {
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .map_or_else(|| "ok".to_string(), str::to_string);
        let uptime_seconds = raw.get("uptime_seconds").and_then(Value::as_u64);
        let bundle_status = raw.get("bundle_status").cloned();
        Self {
            status,
            uptime_seconds,
            bundle_status,
            raw,
        }
    }
}

// ============================================================================
// SECTION: Bundles
// ============================================================================

/// Activation state of one policy bundle.
///
/// # Invariants
/// - Fields are untrusted service output; absence is represented, never
///   invented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleState {
    /// Active revision identifier.
    #[serde(default)]
    pub active_revision: String,
    /// Timestamp of the last successful bundle download.
    #[serde(default)]
    pub last_successful_download: Option<String>,
    /// Timestamp of the last successful bundle activation.
    #[serde(default)]
    pub last_successful_activation: Option<String>,
    /// Bundle-level error messages reported by the service.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Bundle status document returned by the status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BundleStatusDocument {
    /// Bundle states keyed by bundle name.
    #[serde(default)]
    pub bundles: BTreeMap<String, BundleState>,
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Outcome of one decision evaluation.
///
/// # Invariants
/// - `result` is `None` when the response lacks the well-known `result` key,
///   which the service uses to express an undefined decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    /// Decision value, absent for undefined decisions.
    pub result: Option<Value>,
    /// Optional decision identifier assigned by the service.
    pub decision_id: Option<String>,
    /// Optional evaluation metrics document.
    pub metrics: Option<Value>,
}

impl DecisionOutcome {
    /// Builds a decision view from a raw evaluation response document.
    #[must_use]
    pub fn from_document(raw: &Value) -> Self {
        Self {
            result: raw.get("result").cloned(),
            decision_id: raw.get("decision_id").and_then(Value::as_str).map(str::to_string),
            metrics: raw.get("metrics").cloned(),
        }
    }
}
