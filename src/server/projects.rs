use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::server::AppState;
use crate::server::dto::{CreateProjectRequest, ListProjectsParams, UpdateProjectRequest};
use crate::server::lookup::resolve_project;
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::{validate_name, validate_page};
use crate::store::ProjectFilter;
use crate::types::Project;
use crate::uid::generate_uid;

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    validate_name(&req.name, "project")?;

    let now = Utc::now();
    let project = Project {
        uid: req.uid.unwrap_or_else(|| generate_uid("PROJ")),
        name: req.name,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    state.store.create_project(&project)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(project))))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListProjectsParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;
    let filter = ProjectFilter {
        uid: params.uid,
        name: params.name,
        include_deleted: params.include_deleted,
    };

    let (projects, count) = state.store.list_projects(&filter, page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        projects,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let project = resolve_project(state.store.as_ref(), &ident)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(project)))
}

pub async fn get_project_overview(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let project = resolve_project(state.store.as_ref(), &ident)?;
    let overview = state
        .store
        .project_overview(&project.uid)?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok::<_, ApiError>(Json(ApiResponse::success(overview)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> impl IntoResponse {
    let mut project = resolve_project(state.store.as_ref(), &ident)?;

    if let Some(name) = req.name {
        validate_name(&name, "project")?;
        project.name = name;
    }
    project.updated_at = Utc::now();
    state.store.update_project(&project)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> impl IntoResponse {
    let project = resolve_project(state.store.as_ref(), &ident)?;
    state.store.delete_project(&project.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
