//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tower::ServiceExt;

use gatehouse_api::state::AppState;
use gatehouse_core::config::{AppConfig, Argon2Config, AuthConfig};
use gatehouse_core::traits::ManualClock;

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for seeding users directly
    pub state: AppState,
    /// Controllable time source
    pub clock: Arc<ManualClock>,
}

/// Credentials attached to a test request
pub enum Auth<'a> {
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
    /// `Authorization: Basic base64(user:pass)`
    Basic(&'a str, &'a str),
}

impl TestApp {
    /// Create a test application with rotation enabled
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::new(config, clock.clone()).expect("Failed to build app state");
        let router = gatehouse_api::router::build_router(state.clone());

        Self {
            router,
            state,
            clock,
        }
    }

    /// Register a user directly in the credential store
    pub fn create_test_user(&self, username: &str, password: &str, roles: &[&str]) {
        self.state
            .credential_store
            .register(
                username,
                password,
                roles.iter().map(|r| r.to_string()).collect(),
            )
            .expect("Failed to create test user");
    }

    /// Login and return the token payload
    pub async fn login(&self, username: &str, password: &str, remember_me: bool) -> Value {
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "remember_me": remember_me,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"].clone()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Option<Auth<'_>>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        match auth {
            Some(Auth::Bearer(token)) => {
                req = req.header("Authorization", format!("Bearer {token}"));
            }
            Some(Auth::Basic(user, pass)) => {
                let encoded = STANDARD.encode(format!("{user}:{pass}"));
                req = req.header("Authorization", format!("Basic {encoded}"));
            }
            None => {}
        }

        let body = match body {
            Some(json) => {
                req = req.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&json).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Configuration with a valid secret and cheap Argon2 parameters
pub fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            argon2: Argon2Config {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// String field under `data`
    pub fn data_str(&self, field: &str) -> &str {
        self.body["data"][field].as_str().unwrap_or_default()
    }
}
