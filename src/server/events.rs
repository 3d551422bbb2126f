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
use crate::server::dto::{CreateEventRequest, ListEventsParams, UpdateEventRequest};
use crate::server::lookup::{resolve_event, resolve_project};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::validate_page;
use crate::store::EventFilter;
use crate::types::Event;
use crate::uid::generate_uid;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEventRequest>,
) -> impl IntoResponse {
    if req.kind.trim().is_empty() {
        return Err(ApiError::bad_request("event kind cannot be empty"));
    }
    let project_uid = match req.project_uid {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };

    let now = Utc::now();
    let event = Event {
        uid: req.uid.unwrap_or_else(|| generate_uid("EVENT")),
        project_uid,
        kind: req.kind,
        payload: req
            .payload
            .unwrap_or_else(|| Value::Object(Default::default())),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    state.store.create_event(&event)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(event))))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListEventsParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;

    let project_uid = match params.project {
        Some(ident) => Some(resolve_project(state.store.as_ref(), &ident)?.uid),
        None => None,
    };
    let filter = EventFilter {
        uid: params.uid,
        project_uid,
        kind: params.kind,
        include_deleted: params.include_deleted,
    };

    let (events, count) = state.store.list_events(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        events,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let event = resolve_event(state.store.as_ref(), &uid)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> impl IntoResponse {
    let mut event = resolve_event(state.store.as_ref(), &uid)?;

    if let Some(kind) = req.kind {
        if kind.trim().is_empty() {
            return Err(ApiError::bad_request("event kind cannot be empty"));
        }
        event.kind = kind;
    }
    if let Some(payload) = req.payload {
        event.payload = payload;
    }
    event.updated_at = Utc::now();
    state.store.update_event(&event)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(event)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let event = resolve_event(state.store.as_ref(), &uid)?;
    state.store.delete_event(&event.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
