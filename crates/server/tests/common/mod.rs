//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the full router around a
//! real [`AppState`], so requests run through the same handlers, middleware and
//! orchestrator as in production without binding a socket.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use planet_express_core::{Config, DispatchConfig, ServerConfig};
use planet_express_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use planet_express_core::testing::fixtures;

/// Transit time used by fixtures unless a test asks otherwise.
pub const FAST_TRANSIT: Duration = Duration::from_millis(30);

/// Test fixture wrapping an in-process router.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_delivery() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/deliveries", json!({
///         "recipient": "Zoidberg",
///         "address": "New New York",
///         "contents": "Slurm"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state, for inspecting pools and ledger directly
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

/// Default config for tests: default roster and fleet, fast transit.
pub fn test_config(transit: Duration) -> Config {
    Config {
        server: ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0, // Not used for in-process testing
        },
        dispatch: DispatchConfig::with_fixed_transit(transit),
        ..Default::default()
    }
}

impl TestFixture {
    /// Create a fixture with the default crew, one ship and fast transit.
    pub fn new() -> Self {
        Self::with_config(test_config(FAST_TRANSIT))
    }

    /// Create a fixture from a configuration.
    pub fn with_config(config: Config) -> Self {
        let state = AppState::from_config(config).expect("Failed to build app state");
        Self::with_state(Arc::new(state))
    }

    /// Create a fixture around prepared state (e.g. with mock collaborators).
    pub fn with_state(state: Arc<AppState>) -> Self {
        let router = create_router(Arc::clone(&state));
        Self { router, state }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a request with an arbitrary method and no body.
    pub async fn send(&self, method: &str, path: &str) -> TestResponse {
        self.request(method, path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.execute(request).await
    }

    /// Wait for every scheduled completion task.
    pub async fn wait_idle(&self) {
        self.state.orchestrator().wait_idle().await;
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.execute(request_builder.body(body).unwrap()).await
    }

    async fn execute(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
