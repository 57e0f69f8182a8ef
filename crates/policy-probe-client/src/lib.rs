// crates/policy-probe-client/src/lib.rs
// ============================================================================
// Module: Policy Probe Client
// Description: Resilient HTTP client for the target decision service.
// Purpose: Issue classified, timed, retried operations over one session.
// Dependencies: reqwest, serde, thiserror, tokio, url
// ============================================================================

//! ## Overview
//! One [`ProbeClient`] session owns a pooled connection set and an optional
//! bearer token for the lifetime of a probe run. Every operation returns the
//! typed payload together with the elapsed time measured from first request
//! issuance to final response, inclusive of retries, or fails with a
//! classified [`ClientError`].
//!
//! Security posture: service responses are untrusted; bodies are size-capped,
//! error payloads are truncated before they enter messages, and tokens are
//! never logged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod models;

pub use client::ClientOptions;
pub use client::ProbeClient;
pub use error::ClientError;
pub use models::BundleState;
pub use models::DecisionOutcome;
pub use models::HealthStatus;
