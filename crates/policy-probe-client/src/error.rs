// crates/policy-probe-client/src/error.rs
// ============================================================================
// Module: Client Error Taxonomy
// Description: Classified failures for probe client operations.
// Purpose: Keep transport, protocol, and policy faults distinguishable.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Client failures are classified so checks can convert them into Error
//! results with meaningful messages: transport unreachability, per-attempt
//! timeout, terminal HTTP status, malformed response body, service-side
//! decision evaluation failure, and invalid client construction.
//!
//! Security posture: error payloads may contain untrusted server text; HTTP
//! bodies are truncated before they are stored here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Classified probe client failure.
///
/// # Invariants
/// - Variants are stable for check-boundary conversion and tests.
/// - `Http::body` is truncated to a bounded preview before construction.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level unreachability (connect failure, reset, refused).
    #[error("connection to {url} failed: {detail}")]
    Connection {
        /// Request URL.
        url: String,
        /// Transport failure description.
        detail: String,
    },
    /// A single attempt exceeded the configured deadline.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured per-attempt timeout.
        timeout: Duration,
    },
    /// Non-retryable or retry-exhausted HTTP status.
    #[error("service returned HTTP {status} for {url}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
        /// Truncated response body preview.
        body: String,
    },
    /// Response body could not be parsed or exceeded size limits.
    #[error("invalid response from {url}: {detail}")]
    Decode {
        /// Request URL.
        url: String,
        /// Parse failure description.
        detail: String,
    },
    /// Decision evaluation failed on the service side.
    #[error("decision evaluation failed for {path}: {detail}")]
    Policy {
        /// Decision path that failed to evaluate.
        path: String,
        /// Service-supplied error description.
        detail: String,
    },
    /// Invalid client configuration (URL, header material).
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the HTTP status code for HTTP failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }
}
