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
use crate::server::dto::{CreatePublishRequest, ListPublishesParams, UpdatePublishRequest};
use crate::server::lookup::{resolve_project, resolve_publish, resolve_version};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::validate_page;
use crate::store::PublishFilter;
use crate::types::Publish;
use crate::uid::generate_uid;

pub async fn create_publish(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePublishRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let project = resolve_project(store, &req.project_uid)?;
    let version = resolve_version(store, &req.version_uid)?;
    if version.project_uid != project.uid {
        return Err(ApiError::bad_request(
            "version belongs to a different project",
        ));
    }
    if req.path.trim().is_empty() {
        return Err(ApiError::bad_request("publish path cannot be empty"));
    }

    let now = Utc::now();
    let publish = Publish {
        uid: req.uid.unwrap_or_else(|| generate_uid("PUB")),
        project_uid: project.uid,
        version_uid: version.uid,
        kind: req.kind,
        representation: req.representation,
        path: req.path,
        meta: req.meta.unwrap_or_else(|| Value::Object(Default::default())),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    store.create_publish(&publish)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(publish))))
}

pub async fn list_publishes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPublishesParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;
    let store = state.store.as_ref();

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(store, &ident)?.uid),
        None => None,
    };
    let filter = PublishFilter {
        uid: params.uid,
        project_uid,
        version_uid: params.version,
        kind: params.kind,
        representation: params.representation,
        path: params.path,
        include_deleted: params.include_deleted,
    };

    let (publishes, count) = store.list_publishes(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        publishes,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_publish(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let publish = resolve_publish(state.store.as_ref(), &uid)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(publish)))
}

pub async fn update_publish(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(req): Json<UpdatePublishRequest>,
) -> impl IntoResponse {
    let mut publish = resolve_publish(state.store.as_ref(), &uid)?;

    if let Some(kind) = req.kind {
        publish.kind = kind;
    }
    if let Some(representation) = req.representation {
        publish.representation = Some(representation);
    }
    if let Some(path) = req.path {
        if path.trim().is_empty() {
            return Err(ApiError::bad_request("publish path cannot be empty"));
        }
        publish.path = path;
    }
    if let Some(meta) = req.meta {
        publish.meta = meta;
    }
    publish.updated_at = Utc::now();
    state.store.update_publish(&publish)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(publish)))
}

pub async fn delete_publish(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let publish = resolve_publish(state.store.as_ref(), &uid)?;
    state.store.delete_publish(&publish.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
