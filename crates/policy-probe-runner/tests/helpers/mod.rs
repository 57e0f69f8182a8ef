// crates/policy-probe-runner/tests/helpers/mod.rs
// ============================================================================
// Module: Decision Service Fixture
// Description: Route-aware HTTP stub standing in for the decision service.
// Purpose: Exercise run modes, ordering, and fail-fast over real sockets.
// Dependencies: axum, tokio
// ============================================================================

//! Route-aware stub server: answers the health, status, and data surfaces
//! from a configurable fixture and records every request path for ordering
//! assertions.

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

use axum::Router;
use axum::extract::State;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Configurable service behavior for one stub instance.
#[derive(Clone, Debug)]
pub struct ServiceFixture {
    /// Status code answered on the health endpoint.
    pub health_status: u16,
    /// Body answered on the health endpoint.
    pub health_body: Value,
    /// Bundle map answered on the status endpoint.
    pub bundles: Value,
    /// Body answered on decision evaluation requests.
    pub decision_body: Value,
}

impl Default for ServiceFixture {
    fn default() -> Self {
        Self {
            health_status: 200,
            health_body: json!({"status": "ok"}),
            bundles: json!({"main": {"active_revision": "v42"}}),
            decision_body: json!({"result": true}),
        }
    }
}

/// Shared stub state.
#[derive(Clone)]
struct FixtureState {
    fixture: ServiceFixture,
    paths: Arc<Mutex<Vec<String>>>,
}

/// Handle owning the stub server lifetime.
pub struct FixtureHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl FixtureHandle {
    /// Returns the stub base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request paths served so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for FixtureHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns a stub decision service answering from the fixture.
pub fn spawn_fixture(fixture: ServiceFixture) -> Result<FixtureHandle, String> {
    let listener =
        StdTcpListener::bind("127.0.0.1:0").map_err(|err| format!("stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("stub listener nonblocking failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let paths = Arc::new(Mutex::new(Vec::new()));
    let state = FixtureState {
        fixture,
        paths: Arc::clone(&paths),
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
    Ok(FixtureHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        paths,
    })
}

/// Routes a recorded request to the fixture's canned answers.
async fn handle_any(State(state): State<FixtureState>, method: Method, uri: Uri) -> Response {
    let path = uri.path().to_string();
    if let Ok(mut entries) = state.paths.lock() {
        entries.push(path.clone());
    }

    if method == Method::GET && path == "/health" {
        let status = StatusCode::from_u16(state.fixture.health_status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, axum::Json(state.fixture.health_body.clone())).into_response();
    }
    if method == Method::GET && path == "/v1/status" {
        let body = json!({"bundles": state.fixture.bundles});
        return (StatusCode::OK, axum::Json(body)).into_response();
    }
    if method == Method::POST && path.starts_with("/v1/data") {
        return (StatusCode::OK, axum::Json(state.fixture.decision_body.clone())).into_response();
    }
    if method == Method::GET && path.starts_with("/v1/data") {
        return (StatusCode::OK, axum::Json(json!({"result": {}}))).into_response();
    }
    if method == Method::PUT {
        return (StatusCode::OK, axum::Json(json!({}))).into_response();
    }
    (StatusCode::NOT_FOUND, axum::Json(json!({"message": "no such route"}))).into_response()
}
