// crates/policy-probe-client/tests/helpers/mod.rs
// ============================================================================
// Module: Decision Service Stub
// Description: Scriptable HTTP stub standing in for the decision service.
// Purpose: Exercise retry, auth, and timing behavior over real sockets.
// Dependencies: axum, tokio
// ============================================================================

//! Scriptable stub server: each incoming request consumes the next scripted
//! response (the last one repeats once the script is exhausted) and is
//! recorded with method, path, and Authorization header for assertions.

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
    dead_code,
    reason = "Test-only helpers; not every test binary uses every item."
)]

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::RETRY_AFTER;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::Value;
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// One scripted stub response.
#[derive(Clone, Debug)]
pub struct StubResponse {
    /// HTTP status code to answer with.
    pub status: u16,
    /// JSON body to answer with.
    pub body: Value,
    /// Optional Retry-After header value in seconds.
    pub retry_after: Option<u64>,
    /// Optional artificial response delay.
    pub delay: Duration,
}

impl StubResponse {
    /// Builds a plain JSON response.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            retry_after: None,
            delay: Duration::ZERO,
        }
    }

    /// Attaches a Retry-After directive in seconds.
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Attaches an artificial response delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Request metadata recorded by the stub.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// HTTP method of the request.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Authorization header value, when present.
    pub authorization: Option<String>,
    /// Request body bytes.
    pub body: Vec<u8>,
}

/// Shared stub state.
#[derive(Clone)]
struct StubState {
    script: Arc<Mutex<Vec<StubResponse>>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle owning the stub server lifetime.
pub struct StubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubHandle {
    /// Returns the stub base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a snapshot of recorded requests.
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Returns the number of requests the stub has served.
    pub fn hits(&self) -> usize {
        self.recorded.lock().map_or(0, |entries| entries.len())
    }
}

impl Drop for StubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns a stub decision service answering with the scripted responses in
/// order; the final entry repeats for any further requests.
pub fn spawn_stub(script: Vec<StubResponse>) -> Result<StubHandle, String> {
    let listener =
        StdTcpListener::bind("127.0.0.1:0").map_err(|err| format!("stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("stub listener nonblocking failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let recorded = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        script: Arc::new(Mutex::new(script)),
        recorded: Arc::clone(&recorded),
    };
    let app = Router::new().fallback(handle_any).with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let runtime = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(_) => return,
        };
        runtime.block_on(async move {
            let listener = match tokio::net::TcpListener::from_std(listener) {
                Ok(listener) => listener,
                Err(_) => return,
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(StubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        recorded,
    })
}

/// Records the request and answers with the next scripted response.
async fn handle_any(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    if let Ok(mut entries) = state.recorded.lock() {
        entries.push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            authorization,
            body: bytes.to_vec(),
        });
    }

    let next = {
        let Ok(mut script) = state.script.lock() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };
        if script.len() > 1 { Some(script.remove(0)) } else { script.first().cloned() }
    };
    let Some(response) = next else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    if response.delay > Duration::ZERO {
        sleep(response.delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut reply_headers = HeaderMap::new();
    if let Some(seconds) = response.retry_after {
        if let Ok(value) = seconds.to_string().parse() {
            reply_headers.insert(RETRY_AFTER, value);
        }
    }
    (status, reply_headers, axum::Json(response.body)).into_response()
}
