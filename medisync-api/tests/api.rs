//! Exercises the router through `tower::ServiceExt` without binding a port.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use medisync_api::{build_router, AppState, HospitalStore};
use serde_json::Value;
use tower::ServiceExt;

fn app(name: &str) -> Router {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("medisync-api-tests/{name}-{nanos}.db"));
    build_router(AppState::new(HospitalStore::open(path).expect("open store")))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app("health");
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn register_then_list() {
    let app = app("register");
    let (status, created) = send(
        &app,
        post_json(
            "/api/hospitals",
            r#"{"name":"Central Medical Center","address":"123 Healthcare Ave","phone":"+15551234567","capacity":500}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Central Medical Center");
    assert!(created["id"].as_i64().is_some());
    assert!(created["created_at"].as_str().is_some());

    let (status, listed) = send(&app, get("/api/hospitals")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn bad_registrations_are_400_with_error_body() {
    let app = app("bad");

    let (status, body) = send(&app, post_json("/api/hospitals", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing JSON data");
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["error"], "Bad Request");

    let (status, body) = send(
        &app,
        post_json("/api/hospitals", r#"{"name":"A","address":"B","phone":"123456789"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing field: capacity");

    let (status, body) = send(
        &app,
        post_json(
            "/api/hospitals",
            r#"{"name":"A","address":"B","phone":"555-1234","capacity":1}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "phone: String does not match expected pattern.");

    let (_, listed) = send(&app, get("/api/hospitals")).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn serves_manifest_and_cache_rules() {
    let app = app("pwa");
    let response = app
        .clone()
        .oneshot(get("/manifest.webmanifest"))
        .await
        .expect("response");
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/manifest+json"
    );

    let (status, rules) = send(&app, get("/cache-rules.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rules[0]["cacheName"], "api-responses");
    assert_eq!(rules.as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let app = app("missing");
    let (status, body) = send(&app, get("/api/ambulances")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 404);
}
