// crates/policy-probe-client/src/client.rs
// ============================================================================
// Module: Probe Client Session
// Description: Pooled HTTP session with retry, backoff, auth, and timing.
// Purpose: Drive the decision service API for exactly one probe run.
// Dependencies: reqwest, serde_json, tokio, tracing, url
// ============================================================================

//! ## Overview
//! A [`ProbeClient`] is scoped to one run: it owns the pooled connections and
//! the optional bearer token, and every operation issued through it reuses
//! that pool. Transient statuses (429 and the 5xx service-unavailable class)
//! are retried with exponential backoff, honoring a server-supplied
//! `Retry-After` directive over the computed delay. Other 4xx statuses fail
//! immediately; a per-attempt timeout or transport failure is terminal.
//! Elapsed time is measured from first request issuance to final response,
//! inclusive of retry delays.
//!
//! Security posture: responses are untrusted; bodies are read under a hard
//! size cap and error previews are truncated. The bearer token never appears
//! in logs or error payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::RETRY_AFTER;
use reqwest::redirect::Policy;
use serde_json::Map;
use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;
use tracing::warn;
use url::Url;

use crate::error::ClientError;
use crate::models::BundleState;
use crate::models::BundleStatusDocument;
use crate::models::DecisionOutcome;
use crate::models::HealthStatus;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// HTTP statuses retried with backoff.
const RETRYABLE_STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504];
/// Hard cap on any single computed or server-supplied retry delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);
/// Hard cap on response body size accepted from the service.
const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum bytes of a response body preserved in HTTP error previews.
const MAX_ERROR_BODY_BYTES: usize = 200;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Construction options for one probe client session.
///
/// # Invariants
/// - `base_url` must be an absolute http/https URL.
/// - `max_retries` counts retries after the initial attempt.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the decision service.
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Optional bearer token; absence omits the Authorization header.
    pub auth_token: Option<String>,
    /// Retry budget for transient statuses, after the initial attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub base_backoff: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8181".to_string(),
            timeout: Duration::from_secs(10),
            auth_token: None,
            max_retries: 3,
            base_backoff: Duration::from_millis(500),
        }
    }
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// Body attached to one outgoing request.
enum Payload<'a> {
    /// No request body.
    Empty,
    /// JSON document body.
    Json(&'a Value),
    /// Raw text body (policy source uploads).
    Text(&'a str),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Pooled HTTP session against the decision service, scoped to one run.
///
/// # Invariants
/// - Connections are pooled and reused by every operation of the session.
/// - The session is released when the value is dropped, on every exit path
///   of a run.
#[derive(Debug)]
pub struct ProbeClient {
    /// Pooled reqwest client.
    http: Client,
    /// Parsed base URL, guaranteed to join relative paths.
    base_url: Url,
    /// Optional bearer token injected into authenticated requests.
    auth_token: Option<String>,
    /// Per-attempt timeout, kept for error classification.
    timeout: Duration,
    /// Retry budget after the initial attempt.
    max_retries: u32,
    /// Base backoff delay.
    base_backoff: Duration,
}

impl ProbeClient {
    /// Opens a new session with pooled connections.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the base URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&options.base_url)?;
        let http = Client::builder()
            .timeout(options.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            base_url,
            auth_token: options.auth_token,
            timeout: options.timeout,
            max_retries: options.max_retries,
            base_backoff: options.base_backoff,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Queries the health endpoint and parses the status document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, timeout, or HTTP failure.
    pub async fn health(&self) -> Result<(HealthStatus, Duration), ClientError> {
        let url = self.endpoint("health")?;
        let (_, body, elapsed) =
            self.send_with_retry(Method::GET, &url, &Payload::Empty).await?;
        let document = parse_document(&url, &body)?;
        Ok((HealthStatus::from_document(document), elapsed))
    }

    /// Reads the bundle activation status document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, timeout, HTTP, or parse failure.
    pub async fn bundle_status(
        &self,
    ) -> Result<(BTreeMap<String, BundleState>, Duration), ClientError> {
        let url = self.endpoint("v1/status")?;
        let (_, body, elapsed) =
            self.send_with_retry(Method::GET, &url, &Payload::Empty).await?;
        let document = parse_document(&url, &body)?;
        let parsed: BundleStatusDocument = serde_json::from_value(document).map_err(|err| {
            ClientError::Decode {
                url: url.to_string(),
                detail: format!("invalid bundle status document: {err}"),
            }
        })?;
        Ok((parsed.bundles, elapsed))
    }

    /// Evaluates a decision for the given input document.
    ///
    /// A missing `result` key in the response is an undefined decision, not a
    /// failure. An engine-side error body (`code` plus `message`) raises
    /// [`ClientError::Policy`] distinct from transport errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, timeout, HTTP, parse, or
    /// evaluation failure.
    pub async fn evaluate_decision(
        &self,
        path: &str,
        input: &Value,
    ) -> Result<(DecisionOutcome, Duration), ClientError> {
        let url = self.endpoint(&data_path(path))?;
        let mut request_body = Map::new();
        request_body.insert("input".to_string(), input.clone());
        let payload = Value::Object(request_body);
        let (_, body, elapsed) =
            self.send_with_retry(Method::POST, &url, &Payload::Json(&payload)).await?;
        let document = parse_document(&url, &body)?;
        if let Some(detail) = evaluation_error(&document) {
            return Err(ClientError::Policy {
                path: path.to_string(),
                detail,
            });
        }
        Ok((DecisionOutcome::from_document(&document), elapsed))
    }

    /// Reads the value stored under a data path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, timeout, HTTP, or parse failure.
    pub async fn get_data(&self, path: &str) -> Result<(Option<Value>, Duration), ClientError> {
        let url = self.endpoint(&data_path(path))?;
        let (_, body, elapsed) =
            self.send_with_retry(Method::GET, &url, &Payload::Empty).await?;
        let document = parse_document(&url, &body)?;
        Ok((document.get("result").cloned(), elapsed))
    }

    /// Writes a value under a data path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, timeout, or HTTP failure.
    pub async fn put_data(&self, path: &str, value: &Value) -> Result<Duration, ClientError> {
        let url = self.endpoint(&data_path(path))?;
        let (_, _, elapsed) =
            self.send_with_retry(Method::PUT, &url, &Payload::Json(value)).await?;
        Ok(elapsed)
    }

    /// Uploads policy source text under a policy name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, timeout, or HTTP failure.
    pub async fn put_policy(&self, name: &str, source: &str) -> Result<Duration, ClientError> {
        let trimmed = name.trim_start_matches('/');
        let url = self.endpoint(&format!("v1/policies/{trimmed}"))?;
        let (_, _, elapsed) =
            self.send_with_retry(Method::PUT, &url, &Payload::Text(source)).await?;
        Ok(elapsed)
    }

    /// Probes a path without the Authorization header and returns the status
    /// code, using the same connection pool.
    ///
    /// Used to verify that the service actually enforces authentication; a
    /// non-2xx status is an observation here, not a failure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or timeout failure.
    pub async fn unauthenticated_status(
        &self,
        path: &str,
    ) -> Result<(u16, Duration), ClientError> {
        let url = self.endpoint(path.trim_start_matches('/'))?;
        let started = Instant::now();
        debug!(url = %url, "issuing unauthenticated probe");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| classify_send_error(&url, self.timeout, &err))?;
        let status = response.status().as_u16();
        Ok((status, started.elapsed()))
    }

    /// Joins a relative path onto the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|err| {
            ClientError::Config(format!("invalid request path {path}: {err}"))
        })
    }

    /// Sends one logical request, retrying transient statuses with backoff.
    ///
    /// Returns the final status, the response body, and the elapsed time from
    /// first issuance to final response, inclusive of retry delays.
    async fn send_with_retry(
        &self,
        method: Method,
        url: &Url,
        payload: &Payload<'_>,
    ) -> Result<(StatusCode, Vec<u8>, Duration), ClientError> {
        let started = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(token) = &self.auth_token {
                request = request.bearer_auth(token);
            }
            request = match payload {
                Payload::Empty => request,
                Payload::Json(value) => request.json(value),
                Payload::Text(text) => request
                    .header(CONTENT_TYPE, "text/plain")
                    .body((*text).to_string()),
            };
            debug!(url = %url, method = %method, attempt, "issuing request");
            let response = request
                .send()
                .await
                .map_err(|err| classify_send_error(url, self.timeout, &err))?;
            let status = response.status();

            if is_retryable_status(status) && attempt <= self.max_retries {
                let delay = retry_after_hint(response.headers())
                    .unwrap_or_else(|| backoff_for_attempt(self.base_backoff, attempt))
                    .min(MAX_RETRY_DELAY);
                warn!(
                    url = %url,
                    status = status.as_u16(),
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "transient status, backing off before retry"
                );
                sleep(delay).await;
                continue;
            }

            let body = read_body_with_limit(url, response).await?;
            if !status.is_success() {
                return Err(ClientError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                    body: truncate_preview(&body),
                });
            }
            return Ok((status, body, started.elapsed()));
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates the base URL for the session.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut normalized = raw.trim_end_matches('/').to_string();
    normalized.push('/');
    let url = Url::parse(&normalized)
        .map_err(|err| ClientError::Config(format!("invalid base url {raw}: {err}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ClientError::Config(format!(
            "base url {raw} must use http or https"
        )));
    }
    if url.host_str().is_none() {
        return Err(ClientError::Config(format!("base url {raw} has no host")));
    }
    Ok(url)
}

/// Builds a data API path from a decision or data path.
fn data_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    format!("v1/data/{trimmed}")
}

/// Returns true when the status belongs to the retryable set.
fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status.as_u16())
}

/// Extracts an integer-seconds retry-after directive when present.
fn retry_after_hint(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Computes the exponential backoff delay for a retry attempt.
fn backoff_for_attempt(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let factor = 1_u32 << exponent;
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

/// Classifies a reqwest send failure into the client taxonomy.
fn classify_send_error(url: &Url, timeout: Duration, err: &reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Timeout {
            url: url.to_string(),
            timeout,
        };
    }
    ClientError::Connection {
        url: url.to_string(),
        detail: err.to_string(),
    }
}

/// Reads a response body while enforcing the hard size cap.
async fn read_body_with_limit(
    url: &Url,
    mut response: reqwest::Response,
) -> Result<Vec<u8>, ClientError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| ClientError::Connection {
        url: url.to_string(),
        detail: format!("body read failed: {err}"),
    })? {
        if body.len().saturating_add(chunk.len()) > MAX_RESPONSE_BYTES {
            return Err(ClientError::Decode {
                url: url.to_string(),
                detail: "response exceeds size limit".to_string(),
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parses a response body as a JSON document, treating empty as `{}`.
fn parse_document(url: &Url, body: &[u8]) -> Result<Value, ClientError> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|err| ClientError::Decode {
        url: url.to_string(),
        detail: format!("invalid json body: {err}"),
    })
}

/// Detects an engine-side evaluation error embedded in a 2xx document.
fn evaluation_error(document: &Value) -> Option<String> {
    let code = document.get("code").and_then(Value::as_str)?;
    let message = document.get("message").and_then(Value::as_str)?;
    Some(format!("{code}: {message}"))
}

/// Truncates a body to a bounded UTF-8 preview for error payloads.
fn truncate_preview(body: &[u8]) -> String {
    let preview = String::from_utf8_lossy(body);
    preview.chars().take(MAX_ERROR_BODY_BYTES).collect()
}
