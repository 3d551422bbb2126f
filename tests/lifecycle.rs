//! Integration tests for the task/version/publish lifecycle.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json};
use serde_json::json;

#[tokio::test]
async fn test_task_creation_seeds_first_version() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let body = body_json(get(app, &format!("/tasks/{task}/versions")).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["vnum"], 1);
    assert_eq!(body["data"][0]["status"], "draft");
    // created_by falls back to the assignee.
    assert_eq!(body["data"][0]["created_by"], "ada");
}

#[tokio::test]
async fn test_task_serializes_parent_inline() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let body = body_json(get(app, &format!("/tasks/{task}")).await).await;
    assert_eq!(body["data"]["parent_type"], "shot");
    assert_eq!(body["data"]["parent_uid"], shot.as_str());
}

#[tokio::test]
async fn test_task_with_missing_parent_returns_404() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app,
        "/tasks",
        json!({
            "project_uid": project,
            "parent_type": "shot",
            "parent_uid": "SHOT_ZZZZZZ",
            "name": "comp",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_parent_must_share_project() {
    let (app, _store) = build_test_app();
    let project_a = common::create_project(&app, "alpha").await;
    let project_b = common::create_project(&app, "bravo").await;
    let shot_b = common::create_shot(&app, &project_b, "010", "0010").await;

    let response = post_json(
        app,
        "/tasks",
        json!({
            "project_uid": project_a,
            "parent_type": "shot",
            "parent_uid": shot_b,
            "name": "comp",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_version_auto_numbering() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    // Task creation seeded v1; the next automatic number is 2.
    let response = post_json(
        app.clone(),
        "/versions",
        json!({ "project_uid": project, "task_uid": task }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["vnum"], 2);

    let response = post_json(
        app,
        "/versions",
        json!({ "project_uid": project, "task_uid": task }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["vnum"], 3);
}

#[tokio::test]
async fn test_explicit_duplicate_vnum_returns_409() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let response = post_json(
        app,
        "/versions",
        json!({ "project_uid": project, "task_uid": task, "vnum": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleted_version_number_is_not_reused() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let response = post_json(
        app.clone(),
        "/versions",
        json!({ "project_uid": project, "task_uid": task }),
    )
    .await;
    let v2 = body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let response = delete(app.clone(), &format!("/versions/{v2}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/versions",
        json!({ "project_uid": project, "task_uid": task }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["vnum"], 3);
}

#[tokio::test]
async fn test_publish_flag_requires_path() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let response = post_json(
        app.clone(),
        "/versions?publish=true",
        json!({ "project_uid": project, "task_uid": task }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/versions?publish=true",
        json!({ "project_uid": project, "task_uid": task, "path": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_flag_creates_version_and_publish() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let response = post_json(
        app.clone(),
        "/versions?publish=true",
        json!({
            "project_uid": project,
            "task_uid": task,
            "publish_type": "comp",
            "representation": "exr",
            "path": "/prod/demo/010/0010/comp/v002",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let version = body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let body = body_json(get(app, &format!("/publishes?version={version}")).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["type"], "comp");
    assert_eq!(body["data"][0]["path"], "/prod/demo/010/0010/comp/v002");
}

#[tokio::test]
async fn test_standalone_publish_requires_existing_version() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app,
        "/publishes",
        json!({
            "project_uid": project,
            "version_uid": "VER_ZZZZZZ",
            "type": "comp",
            "path": "/prod/x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publish_type_and_representation_are_constrained() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;
    let body = body_json(get(app.clone(), &format!("/tasks/{task}/versions")).await).await;
    let version = body["data"][0]["uid"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/publishes",
        json!({
            "project_uid": project,
            "version_uid": version,
            "type": "anything",
            "path": "/prod/x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_json(
        app.clone(),
        "/publishes",
        json!({
            "project_uid": project,
            "version_uid": version,
            "type": "geo",
            "representation": "fbx",
            "path": "/prod/x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_json(
        app,
        "/publishes",
        json!({
            "project_uid": project,
            "version_uid": version,
            "type": "geo",
            "representation": "usd",
            "path": "/prod/x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_asset_tasks_subresource() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app.clone(),
        "/assets",
        json!({ "project_uid": project, "name": "hero_car", "type": "vehicle" }),
    )
    .await;
    let asset = body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json(
        app.clone(),
        "/tasks",
        json!({
            "project_uid": project,
            "parent_type": "asset",
            "parent_uid": asset,
            "name": "model",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(get(app, &format!("/assets/{asset}/tasks")).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "model");
    assert_eq!(body["data"][0]["parent_type"], "asset");
}

#[tokio::test]
async fn test_asset_tasks_subresource_honors_filters() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;

    let response = post_json(
        app.clone(),
        "/assets",
        json!({ "project_uid": project, "name": "hero_car", "type": "vehicle" }),
    )
    .await;
    let asset = body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string();

    for name in ["model", "lookdev"] {
        let response = post_json(
            app.clone(),
            "/tasks",
            json!({
                "project_uid": project,
                "parent_type": "asset",
                "parent_uid": asset,
                "name": name,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body = body_json(get(app.clone(), &format!("/assets/{asset}/tasks?name=model")).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "model");

    // A soft-deleted task only shows up with include_deleted.
    let deleted = body["data"][0]["uid"].as_str().unwrap().to_string();
    let response = delete(app.clone(), &format!("/tasks/{deleted}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = body_json(get(app.clone(), &format!("/assets/{asset}/tasks")).await).await;
    assert_eq!(body["count"], 1);
    let body =
        body_json(get(app, &format!("/assets/{asset}/tasks?include_deleted=true")).await).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_task_versions_include_deleted() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    let body = body_json(get(app.clone(), &format!("/tasks/{task}/versions")).await).await;
    let v1 = body["data"][0]["uid"].as_str().unwrap().to_string();
    let response = delete(app.clone(), &format!("/versions/{v1}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = body_json(get(app.clone(), &format!("/tasks/{task}/versions")).await).await;
    assert_eq!(body["count"], 0);

    let body = body_json(
        get(app, &format!("/tasks/{task}/versions?include_deleted=true")).await,
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["vnum"], 1);
}

#[tokio::test]
async fn test_version_can_be_reparented() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task_a = common::create_task(&app, &project, &shot, "comp").await;
    let task_b = common::create_task(&app, &project, &shot, "light").await;

    let response = post_json(
        app.clone(),
        "/versions",
        json!({ "project_uid": project, "task_uid": task_a, "vnum": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let version = body_json(response).await["data"]["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let response = common::patch_json(
        app.clone(),
        &format!("/versions/{version}"),
        json!({ "task_uid": task_b }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["task_uid"], task_b);

    // An unknown target task is a 404, and the version is left alone.
    let response = common::patch_json(
        app.clone(),
        &format!("/versions/{version}"),
        json!({ "task_uid": "TASK_ZZZZZZ" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(get(app, &format!("/versions/{version}")).await).await;
    assert_eq!(body["data"]["task_uid"], task_b);
}

#[tokio::test]
async fn test_task_versions_ordered_newest_first() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot = common::create_shot(&app, &project, "010", "0010").await;
    let task = common::create_task(&app, &project, &shot, "comp").await;

    for _ in 0..3 {
        let response = post_json(
            app.clone(),
            "/versions",
            json!({ "project_uid": project, "task_uid": task }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body = body_json(get(app, &format!("/tasks/{task}/versions")).await).await;
    let vnums: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["vnum"].as_i64().unwrap())
        .collect();
    assert_eq!(vnums, vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn test_project_overview_counts() {
    let (app, _store) = build_test_app();
    let project = common::create_project(&app, "demo").await;
    let shot_a = common::create_shot(&app, &project, "010", "0010").await;
    common::create_shot(&app, &project, "010", "0020").await;
    common::create_task(&app, &project, &shot_a, "comp").await;

    let body = body_json(get(app, &format!("/projects/{project}/overview")).await).await;
    assert_eq!(body["data"]["name"], "demo");
    assert_eq!(body["data"]["counts"]["shots"], 2);
    assert_eq!(body["data"]["counts"]["tasks"], 1);
}
