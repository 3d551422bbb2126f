use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::{
    CreateTaskRequest, ListTasksParams, ListVersionsParams, UpdateTaskRequest,
};
use crate::server::lookup::{resolve_asset, resolve_project, resolve_shot, resolve_task};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::{validate_name, validate_page};
use crate::store::{TaskFilter, VersionFilter};
use crate::types::{ParentKind, ParentRef, Task, Version, VersionStatus};
use crate::uid::generate_uid;

/// Creates a task together with its seed version (v1, draft) in one
/// transaction. A task never exists without at least one version.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    validate_name(&req.name, "task")?;
    let store = state.store.as_ref();
    let project = resolve_project(store, &req.project_uid)?;

    // The parent must exist and belong to the same project.
    let parent = match req.parent_type {
        ParentKind::Asset => {
            let asset = resolve_asset(store, &req.parent_uid)?;
            if asset.project_uid != project.uid {
                return Err(ApiError::bad_request(
                    "parent asset belongs to a different project",
                ));
            }
            ParentRef::Asset(asset.uid)
        }
        ParentKind::Shot => {
            let shot = resolve_shot(store, &req.parent_uid)?;
            if shot.project_uid != project.uid {
                return Err(ApiError::bad_request(
                    "parent shot belongs to a different project",
                ));
            }
            ParentRef::Shot(shot.uid)
        }
    };

    let now = Utc::now();
    let task = Task {
        uid: req.uid.unwrap_or_else(|| generate_uid("TASK")),
        project_uid: project.uid.clone(),
        parent,
        name: req.name,
        assignee: req.assignee,
        status: req.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    let version = Version {
        uid: generate_uid("VER"),
        project_uid: project.uid,
        task_uid: task.uid.clone(),
        vnum: 1,
        status: VersionStatus::Draft,
        created_by: req.created_by.or_else(|| task.assignee.clone()),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    store.create_task_with_version(&task, &version)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(task))))
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTasksParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };
    let filter = TaskFilter {
        uid: params.uid,
        project_uid,
        parent_kind: params.parent_type,
        parent_uid: params.parent_uid,
        name: params.name,
        assignee: params.assignee,
        status: params.status,
        include_deleted: params.include_deleted,
    };

    let (tasks, count) = state.store.list_tasks(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        tasks,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let task = resolve_task(state.store.as_ref(), &ident)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(task)))
}

/// Versions of this task, newest number first.
pub async fn list_task_versions(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Query(params): Query<ListVersionsParams>,
) -> impl IntoResponse {
    let task = resolve_task(state.store.as_ref(), &ident)?;
    let page = validate_page(params.limit, params.offset)?;

    let filter = VersionFilter {
        uid: params.uid,
        task_uid: Some(task.uid),
        vnum: params.vnum,
        status: params.status,
        created_by: params.created_by,
        include_deleted: params.include_deleted,
        ..Default::default()
    };
    let (versions, count) = state.store.list_task_versions(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        versions,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    let mut task = resolve_task(state.store.as_ref(), &ident)?;

    if let Some(name) = req.name {
        validate_name(&name, "task")?;
        task.name = name;
    }
    if let Some(assignee) = req.assignee {
        task.assignee = Some(assignee);
    }
    if let Some(status) = req.status {
        task.status = status;
    }
    task.updated_at = Utc::now();
    state.store.update_task(&task)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let task = resolve_task(state.store.as_ref(), &ident)?;
    state.store.delete_task(&task.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
