//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use roster_api::{create_api_service, ApiConfig, ApiService, AppState};
use roster_source::DataSource;
use roster_storage::{CacheConfig, InMemoryUserStore, UserStore};
use roster_test_utils::{fixtures, User};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: ApiService,
    pub store: Arc<dyn UserStore>,
}

impl TestApp {
    pub fn with_source(source: Arc<dyn DataSource>) -> Self {
        Self::with_users_and_source(Vec::new(), source)
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self::with_users_and_source(users, Arc::new(roster_test_utils::StubSource::default()))
    }

    pub fn with_users_and_source(users: Vec<User>, source: Arc<dyn DataSource>) -> Self {
        let store: Arc<dyn UserStore> =
            Arc::new(InMemoryUserStore::with_users(users).expect("store should build"));
        let state = AppState::new(Arc::clone(&store), source, CacheConfig::default());
        let router = create_api_service(state, &ApiConfig::default());
        Self { router, store }
    }

    /// Sample users already merged and stored.
    pub fn loaded() -> Self {
        let (users, _) = roster_core::merge_snapshot(fixtures::sample_snapshot());
        Self::with_users(users)
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        TestResponse {
            status,
            body: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn error(&self) -> String {
        self.json()["error"]
            .as_str()
            .expect("error body should carry a message")
            .to_string()
    }
}
