//! In-process HTTP client for the router.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound and
//! the rate limiter stays off.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use hostelhq_core::config::OtpMode;
use hostelhq_core::kernel::TestDependencies;
use hostelhq_core::server::{build_app, AppOptions};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Router over mock dependencies
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(test_deps: &TestDependencies, otp_mode: OtpMode) -> Self {
        let router = build_app(
            test_deps.into_server_deps(otp_mode),
            AppOptions {
                allowed_origins: Vec::new(),
                rate_limit_enabled: false,
            },
        );
        Self { router }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.send(Method::POST, uri, Some(body), token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, None, token).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }
}

/// Token for a caller, signed the way the app signs verification tokens
pub fn token_for(phone_number: &str, is_admin: bool) -> String {
    TestDependencies::jwt_service()
        .create_token(phone_number, is_admin)
        .unwrap()
}
