use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::Value;

use crate::server::AppState;
use crate::server::dto::{
    CreateVersionParams, CreateVersionRequest, ListVersionsParams, UpdateVersionRequest,
};
use crate::server::lookup::{resolve_project, resolve_task, resolve_version};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::validate_page;
use crate::store::VersionFilter;
use crate::types::{Publish, Version};
use crate::uid::generate_uid;

/// Creates a version, optionally publishing it in the same transaction
/// when `?publish=true`. A publish needs an explicit non-empty path.
pub async fn create_version(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreateVersionParams>,
    Json(req): Json<CreateVersionRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let project = resolve_project(store, &req.project_uid)?;
    let task = resolve_task(store, &req.task_uid)?;
    if task.project_uid != project.uid {
        return Err(ApiError::bad_request(
            "task belongs to a different project",
        ));
    }

    let vnum = match req.vnum {
        Some(vnum) if vnum < 1 => {
            return Err(ApiError::bad_request("vnum must be positive"));
        }
        Some(vnum) => vnum,
        None => store.next_vnum(&task.uid)?,
    };

    let now = Utc::now();
    let version = Version {
        uid: req.uid.unwrap_or_else(|| generate_uid("VER")),
        project_uid: project.uid.clone(),
        task_uid: task.uid,
        vnum,
        status: req.status.unwrap_or_default(),
        created_by: req.created_by,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    let publish = if params.publish {
        let path = req
            .path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("publish requires a non-empty path"))?;
        let kind = req
            .publish_kind
            .ok_or_else(|| ApiError::bad_request("publish requires a publish_type"))?;

        Some(Publish {
            uid: generate_uid("PUB"),
            project_uid: project.uid,
            version_uid: version.uid.clone(),
            kind,
            representation: req.representation,
            path: path.to_string(),
            meta: req.meta.unwrap_or_else(|| Value::Object(Default::default())),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    } else {
        None
    };

    store.create_version_with_publish(&version, publish.as_ref())?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(version))))
}

pub async fn list_versions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListVersionsParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;
    let store = state.store.as_ref();

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(store, &ident)?.uid),
        None => None,
    };
    let task_uid = match params.task {
        Some(ident) => Some(resolve_task(store, &ident)?.uid),
        None => None,
    };
    let filter = VersionFilter {
        uid: params.uid,
        project_uid,
        task_uid,
        vnum: params.vnum,
        status: params.status,
        created_by: params.created_by,
        include_deleted: params.include_deleted,
    };

    let (versions, count) = store.list_versions(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        versions,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_version(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let version = resolve_version(state.store.as_ref(), &uid)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(version)))
}

pub async fn update_version(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateVersionRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let mut version = resolve_version(store, &uid)?;

    if let Some(ident) = req.project_uid {
        version.project_uid = resolve_project(store, &ident)?.uid;
    }
    if let Some(ident) = req.task_uid {
        version.task_uid = resolve_task(store, &ident)?.uid;
    }
    if let Some(status) = req.status {
        version.status = status;
    }
    if let Some(created_by) = req.created_by {
        version.created_by = Some(created_by);
    }
    version.updated_at = Utc::now();
    state.store.update_version(&version)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(version)))
}

pub async fn delete_version(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let version = resolve_version(state.store.as_ref(), &uid)?;
    state.store.delete_version(&version.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
