//! Integration tests for the entity CRUD surface and system endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, get_auth, patch_json, post_json, seed_api_key};
use serde_json::json;

#[tokio::test]
async fn test_create_project_returns_201() {
    let (app, _store) = build_test_app();

    let response = post_json(app, "/projects", json!({ "name": "demo" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "demo");
    assert!(body["data"]["uid"].as_str().unwrap().starts_with("PROJ_"));
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_duplicate_project_name_returns_409() {
    let (app, _store) = build_test_app();
    common::create_project(&app, "demo").await;

    let response = post_json(app, "/projects", json!({ "name": "demo" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert!(body["data"].is_null());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_empty_project_name_returns_400() {
    let (app, _store) = build_test_app();
    let response = post_json(app, "/projects", json!({ "name": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_project_by_uid_and_name() {
    let (app, _store) = build_test_app();
    let uid = common::create_project(&app, "demo").await;

    let response = get(app.clone(), &format!("/projects/{uid}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Name works as an identifier too.
    let response = get(app, "/projects/demo").await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["uid"], uid.as_str());
}

#[tokio::test]
async fn test_missing_entity_404_names_the_identifier() {
    let (app, _store) = build_test_app();

    let response = get(app, "/projects/PROJ_ZZZZZZ").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error = body_json(response).await["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(error.contains("project"));
    assert!(error.contains("PROJ_ZZZZZZ"));
}

#[tokio::test]
async fn test_patch_project_renames_and_touches_updated_at() {
    let (app, _store) = build_test_app();
    let uid = common::create_project(&app, "demo").await;

    let response = patch_json(
        app.clone(),
        &format!("/projects/{uid}"),
        json!({ "name": "demo_renamed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "demo_renamed");

    let response = get(app, "/projects/demo_renamed").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_project_returns_204_and_hides_it() {
    let (app, _store) = build_test_app();
    let uid = common::create_project(&app, "demo").await;

    let response = delete(app.clone(), &format!("/projects/{uid}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/projects/{uid}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Hidden from the default listing, visible with include_deleted.
    let body = body_json(get(app.clone(), "/projects").await).await;
    assert_eq!(body["count"], 0);

    let body = body_json(get(app, "/projects?include_deleted=true").await).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_list_pagination_envelope() {
    let (app, _store) = build_test_app();
    for name in ["alpha", "bravo", "charlie", "delta", "echo"] {
        common::create_project(&app, name).await;
    }

    let response = get(app, "/projects?limit=2&offset=0").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["count"], 5);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["offset"], 0);
    // Ordered by name.
    assert_eq!(body["data"][0]["name"], "alpha");
    assert_eq!(body["data"][1]["name"], "bravo");
}

#[tokio::test]
async fn test_list_rejects_out_of_range_limit() {
    let (app, _store) = build_test_app();

    let response = get(app.clone(), "/projects?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/projects?limit=501").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shot_inverted_frame_range_returns_400() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app,
        "/shots",
        json!({
            "project_uid": project,
            "seq": "010",
            "shot": "0010",
            "frame_in": 1100,
            "frame_out": 1001,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shot_range_filter_rejects_malformed_and_inverted() {
    let (app, _store) = build_test_app();

    let response = get(app.clone(), "/shots?range=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app.clone(), "/shots?range=1100-1001").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/shots?range=1001-1100").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_shot_patch_cannot_invert_frame_range() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;

    // frame_in ends up above the stored frame_out of 1100.
    let response = patch_json(app, &format!("/shots/{shot}"), json!({ "frame_in": 1200 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_asset_crud_round_trip() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app.clone(),
        "/assets",
        json!({ "project_uid": project, "name": "hero_car", "type": "vehicle" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let asset = body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let body = body_json(get(app.clone(), &format!("/assets/{asset}")).await).await;
    assert_eq!(body["data"]["type"], "vehicle");

    let response = patch_json(
        app.clone(),
        &format!("/assets/{asset}"),
        json!({ "type": "prop" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["type"], "prop");

    let response = delete(app, &format!("/assets/{asset}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_render_job_crud() {
    let (app, _store) = build_test_app();

    let response = post_json(
        app.clone(),
        "/renders",
        json!({ "adapter": "deadline", "context": { "frames": "1001-1100" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "queued");
    let uid = body["data"]["uid"].as_str().unwrap().to_string();
    assert!(uid.starts_with("RJ_"));

    let response = patch_json(
        app.clone(),
        &format!("/renders/{uid}"),
        json!({ "status": "running", "logs": "picked up by worker-3" }),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "running");

    let body = body_json(get(app, "/renders?status=running").await).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_event_crud() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app.clone(),
        "/events",
        json!({ "project_uid": project, "kind": "ingest", "payload": { "files": 3 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["payload"]["files"], 3);

    let body = body_json(get(app, "/events?kind=ingest").await).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_unknown_status_value_returns_400() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;

    let response = post_json(
        app,
        "/tasks",
        json!({
            "project_uid": project,
            "parent_type": "shot",
            "parent_uid": shot,
            "name": "comp",
            "status": "NOT_A_STATUS",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_v1_and_legacy_prefixes_serve_the_same_routes() {
    let (app, _store) = build_test_app();
    common::create_project(&app, "demo").await;

    let legacy = body_json(get(app.clone(), "/projects").await).await;
    let versioned = body_json(get(app, "/v1/projects").await).await;
    assert_eq!(legacy, versioned);
}

#[tokio::test]
async fn test_root_banner() {
    let (app, _store) = build_test_app();

    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_healthz_minimal_without_auth() {
    let (app, _store) = build_test_app();

    let body = body_json(get(app, "/healthz").await).await;
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_healthz_full_report_with_auth() {
    let (app, store) = build_test_app();
    let key = seed_api_key(&store, "artist", false);

    let body = body_json(get_auth(app, "/healthz", &key).await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["connected"], true);
}

#[tokio::test]
async fn test_readyz_requires_auth() {
    let (app, store) = build_test_app();

    let response = get(app.clone(), "/readyz").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));

    let key = seed_api_key(&store, "artist", false);
    let response = get_auth(app, "/readyz", &key).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_authz_reports_key_metadata() {
    let (app, store) = build_test_app();
    let key = seed_api_key(&store, "supervisor", true);

    let response = get_auth(app.clone(), "/authz", &key).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["role"], "supervisor");
    assert_eq!(body["is_admin"], true);
}

#[tokio::test]
async fn test_authz_rejects_garbage_key() {
    let (app, _store) = build_test_app();

    let response = get_auth(app, "/authz", "slate_notreal_000000000000000000000000").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
