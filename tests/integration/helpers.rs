//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use account_api::{AppState, build_app};
use account_auth::SessionService;
use account_core::config::{AppConfig, DatabaseProvider};
use account_database::MemoryCredentialStore;

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: Arc<MemoryCredentialStore>,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Memory;
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.validate().expect("Test config must be valid");

        let store = Arc::new(MemoryCredentialStore::new());
        let sessions = SessionService::new(store.clone(), &config.auth)
            .expect("Test config must build a session service");
        let router = build_app(AppState::new(config, sessions));

        Self { router, store }
    }

    /// Register a user and return its id
    pub async fn register(&self, email: &str, password: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/register",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        response.body["id"].as_i64().expect("No id in register response")
    }

    /// Login and return the token pair body
    pub async fn login(&self, email: &str, password: &str, device_id: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/login",
                Some(json!({ "email": email, "password": password, "device_id": device_id })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body
    }

    /// Present a refresh token
    pub async fn refresh(&self, refresh_token: &str, device_id: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/refresh",
            Some(json!({ "refresh_token": refresh_token, "device_id": device_id })),
            None,
        )
        .await
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        self.send(req.body(Body::from(body_str)).expect("Failed to build request"))
            .await
    }

    /// Send a prebuilt request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when empty
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Extract a string field from a token pair body
pub fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body[name]
        .as_str()
        .unwrap_or_else(|| panic!("No {name} in {body:?}"))
}
