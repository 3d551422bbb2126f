use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use serde::Serialize;

use crate::auth::{KeyGenerator, RequireAdmin};
use crate::server::AppState;
use crate::server::dto::{CreateKeyRequest, ListKeysParams};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::server::validation::validate_page;
use crate::types::ApiKey;
use crate::uid::generate_uid;

const VALID_ROLES: &[&str] = &[
    "admin",
    "td",
    "atd",
    "artist",
    "producer",
    "supervisor",
    "service",
    "system",
    "client",
];

/// The only response that ever carries the raw key.
#[derive(Debug, Serialize)]
pub struct CreatedKey {
    pub key: String,
    pub metadata: ApiKey,
}

pub async fn create_key(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateKeyRequest>,
) -> impl IntoResponse {
    let role = req.role.unwrap_or_else(|| "service".to_string());
    if !VALID_ROLES.contains(&role.as_str()) {
        return Err(ApiError::bad_request(format!("invalid role '{role}'")));
    }

    if let Some(seconds) = req.expires_in_seconds {
        if seconds <= 0 {
            return Err(ApiError::bad_request(
                "expires_in_seconds must be positive",
            ));
        }
    }
    let expires_at = req
        .expires_in_seconds
        .map(|s| Utc::now() + Duration::seconds(s));

    let generator = KeyGenerator::new();
    let (raw_key, lookup, hash) = generator
        .generate()
        .map_err(|_| ApiError::internal("Failed to generate key"))?;

    let key = ApiKey {
        uid: generate_uid("KEY"),
        key_hash: hash,
        key_lookup: lookup,
        description: req.description,
        is_admin: role == "admin",
        role,
        expires_at,
        created_at: Utc::now(),
        last_used_at: None,
    };
    state.store.create_api_key(&key)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedKey {
            key: raw_key,
            metadata: key,
        })),
    ))
}

pub async fn list_keys(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListKeysParams>,
) -> impl IntoResponse {
    let page = validate_page(params.limit, params.offset)?;
    let (keys, count) = state.store.list_api_keys(page)?;
    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        keys,
        count,
        page.limit,
        page.offset,
    )))
}

pub async fn delete_key(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let key = state
        .store
        .get_api_key(&uid)?
        .ok_or_else(|| ApiError::not_found(format!("api key '{uid}' not found")))?;

    if key.uid == admin.0.uid {
        return Err(ApiError::bad_request("Cannot revoke the current key"));
    }

    state.store.delete_api_key(&key.uid)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
