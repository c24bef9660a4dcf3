//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use shelf_server::app::{self, Services};
use shelf_server::backend::{
    BackendError, Identity, IdentityBackend, MemoryIdentity, UserId, UserSummary,
};
use shelf_server::config::AppConfig;
use shelf_server::http::HttpServer;
use shelf_server::routing::RouteTable;

pub const ADMIN: (&str, &str) = ("root", "root-pw");
pub const READER: (&str, &str) = ("reader", "reader-pw");

/// Identity backend that counts calls to the administrative operations.
pub struct CountingIdentity {
    inner: MemoryIdentity,
    pub list_users_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
}

impl CountingIdentity {
    pub async fn seeded() -> Self {
        let inner = MemoryIdentity::new();
        inner.create_admin(ADMIN.0, ADMIN.1).await.unwrap();
        inner.register(READER.0, READER.1).await.unwrap();
        Self {
            inner,
            list_users_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityBackend for CountingIdentity {
    async fn register(&self, username: &str, password: &str) -> Result<UserId, BackendError> {
        self.inner.register(username, password).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        self.inner.login(username, password).await
    }

    async fn logout(&self, token: &str) {
        self.inner.logout(token).await
    }

    async fn resolve(&self, token: &str) -> Option<Identity> {
        self.inner.resolve(token).await
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, BackendError> {
        self.list_users_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_users().await
    }

    async fn reset_counters(&self) -> Result<usize, BackendError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.reset_counters().await
    }
}

pub struct TestApp {
    pub router: Router,
    pub table: Arc<RouteTable>,
    pub services: Services,
    pub identity: Arc<CountingIdentity>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}

/// The full application over the declared manifest, with a counting identity.
pub async fn test_app() -> TestApp {
    test_app_with(test_config()).await
}

pub async fn test_app_with(config: AppConfig) -> TestApp {
    let identity = Arc::new(CountingIdentity::seeded().await);
    let mut services = Services::bootstrap(&config).await.unwrap();
    services.identity = identity.clone();

    let table = Arc::new(app::build_table(&config, &services).unwrap());
    let router = HttpServer::new(Arc::clone(&table), config.http.max_body_bytes).router();
    TestApp {
        router,
        table,
        services,
        identity,
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    /// `name=value` part of the Set-Cookie header.
    pub fn cookie(&self) -> String {
        self.headers[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Reply {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let body = body.to_string();
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len());
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Log in through the real route and return the `Cookie` header value.
pub async fn login(router: &Router, (username, password): (&str, &str)) -> String {
    let reply = send(
        router,
        json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.cookie()
}
