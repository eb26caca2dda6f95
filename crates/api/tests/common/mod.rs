#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use gatepass_core::status::TransitionPolicy;
use gatepass_db::{MemoryVisitStore, VisitStore};
use gatepass_events::{
    AppTarget, Channel, NotificationConfig, NotificationRouter, SecurityLog, WebhookDelivery,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gatepass_api::config::{DeploymentMode, ServerConfig};
use gatepass_api::router::build_app_router;
use gatepass_api::state::AppState;

/// A closed local port: connections are refused immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/hook";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(mode: DeploymentMode, policy: TransitionPolicy) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".parse().unwrap()],
        request_timeout_secs: 30,
        mode,
        database_url: None,
        database_max_connections: 1,
        status_policy: policy,
    }
}

/// Notifications that never leave the process: host webhook points at a
/// closed port, security uses the local app channel.
pub fn local_notifications() -> NotificationConfig {
    NotificationConfig {
        host: Channel::Webhook {
            url: UNREACHABLE_URL.to_string(),
        },
        security: Channel::App {
            target: AppTarget::Local,
        },
        timeout: Duration::from_secs(2),
    }
}

/// Handles to the pieces behind a test app.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn VisitStore>,
    pub security_log: Arc<SecurityLog>,
}

impl TestApp {
    /// A fresh clone of the router for one request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router, in-memory store included.
pub fn build_test_app_with(
    mode: DeploymentMode,
    policy: TransitionPolicy,
    notifications: NotificationConfig,
) -> TestApp {
    let config = test_config(mode, policy);
    let store: Arc<dyn VisitStore> = Arc::new(MemoryVisitStore::new(policy));
    let security_log = Arc::new(SecurityLog::new());
    let delivery = WebhookDelivery::new(notifications.timeout).unwrap();
    let notifier = Arc::new(NotificationRouter::new(
        notifications,
        delivery,
        Arc::clone(&security_log),
    ));

    let state = AppState {
        store: Arc::clone(&store),
        notifier,
        security_log: Arc::clone(&security_log),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        security_log,
    }
}

/// Unified deployment, permissive policy, local notifications.
pub fn build_test_app() -> TestApp {
    build_test_app_with(
        DeploymentMode::Unified,
        TransitionPolicy::Permissive,
        local_notifications(),
    )
}

/// Registration body used across tests.
pub fn visitor_body() -> serde_json::Value {
    serde_json::json!({
        "name": "张三",
        "phone": "13800138000",
        "company": "ABC公司",
        "host_name": "李四",
        "host_company": "XYZ公司",
        "host_phone": "13900139000",
    })
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_raw(app: Router, method: Method, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register the standard visitor and return its id.
pub async fn register(test: &TestApp) -> i64 {
    let response = post_json(test.app(), "/api/visitors", visitor_body()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
