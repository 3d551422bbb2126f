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
use crate::server::dto::{CreateRenderJobRequest, ListRenderJobsParams, UpdateRenderJobRequest};
use crate::server::lookup::{resolve_project, resolve_render_job};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::validate_page;
use crate::store::RenderFilter;
use crate::types::RenderJob;
use crate::uid::generate_uid;

pub async fn create_render_job(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRenderJobRequest>,
) -> impl IntoResponse {
    if req.adapter.trim().is_empty() {
        return Err(ApiError::bad_request("adapter cannot be empty"));
    }
    let project_uid = match req.project_uid {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };

    let now = Utc::now();
    let job = RenderJob {
        uid: req.uid.unwrap_or_else(|| generate_uid("RJ")),
        project_uid,
        context: req
            .context
            .unwrap_or_else(|| Value::Object(Default::default())),
        adapter: req.adapter,
        status: req.status.unwrap_or_default(),
        logs: req.logs,
        submitted_at: now,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    state.store.create_render_job(&job)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(job))))
}

pub async fn list_render_jobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRenderJobsParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };
    let filter = RenderFilter {
        uid: params.uid,
        project_uid,
        adapter: params.adapter,
        status: params.status,
        include_deleted: params.include_deleted,
    };

    let (jobs, count) = state.store.list_render_jobs(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        jobs,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_render_job(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let job = resolve_render_job(state.store.as_ref(), &uid)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(job)))
}

pub async fn update_render_job(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateRenderJobRequest>,
) -> impl IntoResponse {
    let mut job = resolve_render_job(state.store.as_ref(), &uid)?;

    if let Some(status) = req.status {
        job.status = status;
    }
    if let Some(logs) = req.logs {
        job.logs = Some(logs);
    }
    if let Some(context) = req.context {
        job.context = context;
    }
    job.updated_at = Utc::now();
    state.store.update_render_job(&job)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(job)))
}

pub async fn delete_render_job(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let job = resolve_render_job(state.store.as_ref(), &uid)?;
    state.store.delete_render_job(&job.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
