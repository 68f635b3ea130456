/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A record store in a throwaway directory
/// - A router with simulator latency switched off, plus its state
/// - Request and JSON body helpers
/// - User registration returning a bearer token

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use toolbox_api::{
    app::{build_router, AppState},
    config::Config,
};
use toolbox_shared::db::RecordStore;
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    /// Keeps the data directory alive for the test
    pub dir: TempDir,
    pub store: RecordStore,
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    /// Creates a context with a fresh store and a generous rate limit
    pub async fn new() -> Self {
        Self::with_rate_limit(10_000).await
    }

    /// Creates a context whose rate limiter allows `per_minute` requests
    pub async fn with_rate_limit(per_minute: u32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.init().await.unwrap();

        let mut config = Config::default();
        config.store.data_dir = dir.path().to_path_buf();
        config.api.rate_limit_per_minute = per_minute;
        config.tools.simulate_latency = false;
        config.auth.jwt_secret = "test-jwt-secret".to_string();
        config.auth.session_secret = "test-session-secret".to_string();

        let state = AppState::new(store.clone(), config);
        let app = build_router(state.clone());

        Self {
            dir,
            store,
            state,
            app,
        }
    }

    /// Sends a request through the router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        self.send_with_cookie(method, uri, token, None, body).await
    }

    /// Sends a request carrying a `Cookie` header
    pub async fn send_with_cookie(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers a user and returns their bearer token
    pub async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": email,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
