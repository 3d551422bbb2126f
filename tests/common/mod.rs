#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use slate::auth::KeyGenerator;
use slate::server::{AppState, Unlimited, create_router};
use slate::store::{SqliteStore, Store};
use slate::types::ApiKey;
use slate::uid::generate_uid;

/// Builds the full application router over a fresh in-memory store, with
/// rate limiting disabled. Returns the store too so tests can seed data
/// or assert on it directly.
pub fn build_test_app() -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().expect("open in-memory store"));
    store.initialize().expect("initialize schema");

    let state = Arc::new(AppState::new(store.clone(), Arc::new(Unlimited)));
    (create_router(state), store)
}

/// Creates an API key in the store and returns the raw key for use in
/// Authorization headers.
pub fn seed_api_key(store: &SqliteStore, role: &str, is_admin: bool) -> String {
    let generator = KeyGenerator::new();
    let (raw_key, lookup, hash) = generator.generate().expect("generate key");

    let key = ApiKey {
        uid: generate_uid("KEY"),
        key_hash: hash,
        key_lookup: lookup,
        description: None,
        role: role.to_string(),
        is_admin,
        expires_at: None,
        created_at: chrono::Utc::now(),
        last_used_at: None,
    };
    store.create_api_key(&key).expect("store key");
    raw_key
}

/// Like `seed_api_key`, but the key expired an hour ago.
pub fn seed_expired_api_key(store: &SqliteStore, role: &str) -> String {
    let generator = KeyGenerator::new();
    let (raw_key, lookup, hash) = generator.generate().expect("generate key");

    let key = ApiKey {
        uid: generate_uid("KEY"),
        key_hash: hash,
        key_lookup: lookup,
        description: None,
        role: role.to_string(),
        is_admin: false,
        expires_at: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
        created_at: chrono::Utc::now() - chrono::Duration::hours(2),
        last_used_at: None,
    };
    store.create_api_key(&key).expect("store key");
    raw_key
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, key: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {key}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    key: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {key}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, key: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {key}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a project over the API and returns its UID.
pub async fn create_project(app: &Router, name: &str) -> String {
    let response = post_json(
        app.clone(),
        "/projects",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Creates a shot over the API and returns its UID.
pub async fn create_shot(app: &Router, project_uid: &str, seq: &str, code: &str) -> String {
    let response = post_json(
        app.clone(),
        "/shots",
        serde_json::json!({
            "project_uid": project_uid,
            "seq": seq,
            "shot": code,
            "frame_in": 1001,
            "frame_out": 1100,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Creates a shot-parented task over the API and returns its UID.
pub async fn create_task(app: &Router, project_uid: &str, shot_uid: &str, name: &str) -> String {
    let response = post_json(
        app.clone(),
        "/tasks",
        serde_json::json!({
            "project_uid": project_uid,
            "parent_type": "shot",
            "parent_uid": shot_uid,
            "name": name,
            "assignee": "ada",
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string()
}
