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
    CreateAssetRequest, ListAssetsParams, ListTasksParams, UpdateAssetRequest,
};
use crate::server::lookup::{resolve_asset, resolve_project};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::{validate_name, validate_page};
use crate::store::{AssetFilter, TaskFilter};
use crate::types::{Asset, ParentKind};
use crate::uid::generate_uid;

pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAssetRequest>,
) -> impl IntoResponse {
    validate_name(&req.name, "asset")?;
    let project = resolve_project(state.store.as_ref(), &req.project_uid)?;

    let now = Utc::now();
    let asset = Asset {
        uid: req.uid.unwrap_or_else(|| generate_uid("ASSET")),
        project_uid: project.uid,
        name: req.name,
        kind: req.kind,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    state.store.create_asset(&asset)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(asset))))
}

pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListAssetsParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };
    let filter = AssetFilter {
        uid: params.uid,
        project_uid,
        name: params.name,
        kind: params.kind,
        include_deleted: params.include_deleted,
    };

    let (assets, count) = state.store.list_assets(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        assets,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let asset = resolve_asset(state.store.as_ref(), &ident)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(asset)))
}

/// Tasks parented by this asset.
pub async fn list_asset_tasks(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Query(params): Query<ListTasksParams>,
) -> impl IntoResponse {
    let asset = resolve_asset(state.store.as_ref(), &ident)?;
    let page = validate_page(params.limit, params.offset)?;

    let filter = TaskFilter {
        uid: params.uid,
        parent_kind: Some(ParentKind::Asset),
        parent_uid: Some(asset.uid),
        name: params.name,
        assignee: params.assignee,
        status: params.status,
        include_deleted: params.include_deleted,
        ..Default::default()
    };
    let (tasks, count) = state.store.list_tasks(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        tasks,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Json(req): Json<UpdateAssetRequest>,
) -> impl IntoResponse {
    let mut asset = resolve_asset(state.store.as_ref(), &ident)?;

    if let Some(name) = req.name {
        validate_name(&name, "asset")?;
        asset.name = name;
    }
    if let Some(kind) = req.kind {
        asset.kind = kind;
    }
    asset.updated_at = Utc::now();
    state.store.update_asset(&asset)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(asset)))
}

pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let asset = resolve_asset(state.store.as_ref(), &ident)?;
    state.store.delete_asset(&asset.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
