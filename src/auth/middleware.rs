use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use super::{KeyGenerator, parse_key};
use crate::server::AppState;
use crate::types::ApiKey;

/// Extractor that requires any valid API key
pub struct RequireAuth(pub ApiKey);

/// Extractor that requires an admin API key
pub struct RequireAdmin(pub ApiKey);

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidKey,
    KeyExpired,
    NotAdmin,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "Invalid authorization scheme"),
            AuthError::InvalidKey => (StatusCode::UNAUTHORIZED, "Invalid API key"),
            AuthError::KeyExpired => (StatusCode::UNAUTHORIZED, "API key expired"),
            AuthError::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                "WWW-Authenticate",
                "Bearer realm=\"slate\"".parse().unwrap(),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_and_validate_key(parts, state)?;
        Ok(RequireAuth(key))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_and_validate_key(parts, state)?;

        if !key.is_admin {
            return Err(AuthError::NotAdmin);
        }

        Ok(RequireAdmin(key))
    }
}

/// Optional variant of [`RequireAuth`]: anonymous requests pass through as
/// `None`, but a present-and-bad key is still rejected.
pub struct MaybeAuth(pub Option<ApiKey>);

impl FromRequestParts<Arc<AppState>> for MaybeAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeAuth(None));
        }
        let key = extract_and_validate_key(parts, state)?;
        Ok(MaybeAuth(Some(key)))
    }
}

fn extract_and_validate_key(parts: &Parts, state: &Arc<AppState>) -> Result<ApiKey, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let raw_key = extract_key_from_header(auth_header)?.ok_or(AuthError::MissingAuth)?;

    validate_key(state, &raw_key)
}

/// Validates a raw key string against the store: lookup, hash check, expiry.
fn validate_key(state: &Arc<AppState>, raw_key: &str) -> Result<ApiKey, AuthError> {
    let (lookup, _secret) = parse_key(raw_key).map_err(|_| AuthError::InvalidKey)?;

    let key = state
        .store
        .get_api_key_by_lookup(&lookup)
        .map_err(|_| AuthError::InternalError)?
        .ok_or(AuthError::InvalidKey)?;

    let generator = KeyGenerator::new();
    if !generator
        .verify(raw_key, &key.key_hash)
        .map_err(|_| AuthError::InternalError)?
    {
        return Err(AuthError::InvalidKey);
    }

    if let Some(expires_at) = &key.expires_at {
        if expires_at < &Utc::now() {
            return Err(AuthError::KeyExpired);
        }
    }

    if let Err(e) = state.store.update_api_key_last_used(&key.uid) {
        tracing::warn!("Failed to update key last_used_at: {e}");
    }

    Ok(key)
}

/// Extracts the raw key from a Bearer Authorization header.
/// Returns None if no auth header is present.
fn extract_key_from_header(auth_header: Option<&str>) -> Result<Option<String>, AuthError> {
    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            Ok(header.strip_prefix("Bearer ").map(str::to_string))
        }
        Some(_) => Err(AuthError::InvalidScheme),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_key() {
        let key = extract_key_from_header(Some("Bearer slate_abc_def")).unwrap();
        assert_eq!(key.as_deref(), Some("slate_abc_def"));
    }

    #[test]
    fn test_extract_missing_header() {
        assert!(extract_key_from_header(None).unwrap().is_none());
    }

    #[test]
    fn test_extract_rejects_basic_scheme() {
        assert!(matches!(
            extract_key_from_header(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidScheme)
        ));
    }
}
