#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use evset_common::types::EventSettingGroup;
use evset_server::app;
use evset_server::config::{self, ServerConfig};
use evset_server::repository::SettingsRepository;
use evset_server::state::AppState;
use serde_json::Value;
use tower::util::ServiceExt;

pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
}

/// Groups from the sample seed shipped in `config/seed.json`.
pub fn sample_seed() -> Vec<EventSettingGroup> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/seed.json");
    config::load_seed(path).expect("sample seed should parse")
}

pub fn build_test_context(seed: Vec<EventSettingGroup>) -> Result<TestContext> {
    let state = AppState::new(
        ServerConfig::default(),
        SettingsRepository::from_groups(seed),
    )?;
    let app = app::build_http_app(state.clone());
    Ok(TestContext { state, app })
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, req).await
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, req).await
}
