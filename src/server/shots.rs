use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::{CreateShotRequest, ListShotsParams, UpdateShotRequest};
use crate::server::lookup::{resolve_project, resolve_shot};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::{parse_frame_range, validate_frame_range, validate_page};
use crate::store::ShotFilter;
use crate::types::Shot;
use crate::uid::generate_uid;

pub async fn create_shot(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShotRequest>,
) -> impl IntoResponse {
    validate_frame_range(req.frame_in, req.frame_out)?;
    let project = resolve_project(state.store.as_ref(), &req.project_uid)?;

    let now = Utc::now();
    let shot = Shot {
        uid: req.uid.unwrap_or_else(|| generate_uid("SHOT")),
        project_uid: project.uid,
        seq: req.seq,
        shot: req.shot,
        frame_in: req.frame_in,
        frame_out: req.frame_out,
        fps: req.fps,
        colorspace: req.colorspace,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    state.store.create_shot(&shot)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(shot))))
}

pub async fn list_shots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListShotsParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };
    let frame_range = match params.range {
        Some(range) => Some(parse_frame_range(&range)?),
        None => None,
    };
    let filter = ShotFilter {
        uid: params.uid,
        project_uid,
        seq: params.seq,
        shot: params.shot,
        frame_range,
        include_deleted: params.include_deleted,
    };

    let (shots, count) = state.store.list_shots(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        shots,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_shot(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let shot = resolve_shot(state.store.as_ref(), &uid)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(shot)))
}

pub async fn update_shot(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateShotRequest>,
) -> impl IntoResponse {
    let mut shot = resolve_shot(state.store.as_ref(), &uid)?;

    if let Some(seq) = req.seq {
        shot.seq = seq;
    }
    if let Some(code) = req.shot {
        shot.shot = code;
    }
    if let Some(frame_in) = req.frame_in {
        shot.frame_in = frame_in;
    }
    if let Some(frame_out) = req.frame_out {
        shot.frame_out = frame_out;
    }
    // Check the merged range, so a single-field patch cannot invert it.
    validate_frame_range(shot.frame_in, shot.frame_out)?;

    if let Some(fps) = req.fps {
        shot.fps = Some(fps);
    }
    if let Some(colorspace) = req.colorspace {
        shot.colorspace = Some(colorspace);
    }
    shot.updated_at = Utc::now();
    state.store.update_shot(&shot)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(shot)))
}

pub async fn delete_shot(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let shot = resolve_shot(state.store.as_ref(), &uid)?;
    state.store.delete_shot(&shot.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
