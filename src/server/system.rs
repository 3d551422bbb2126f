use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::auth::{MaybeAuth, RequireAuth};
use crate::server::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

/// Liveness probe. Anonymous callers get a minimal answer; authenticated
/// callers get the full health report.
pub async fn healthz(auth: MaybeAuth, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if auth.0.is_none() {
        return Json(json!({ "ok": true }));
    }

    let database = match state.store.ping() {
        Ok(()) => json!({ "status": "healthy", "connected": true }),
        Err(e) => {
            tracing::error!("Health check database ping failed: {e}");
            json!({ "status": "unhealthy", "error": e.to_string() })
        }
    };
    let healthy = database["status"] == "healthy";

    Json(json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": { "database": database },
    }))
}

/// Readiness probe: authenticated, answers 503 until the store responds.
pub async fn readyz(_auth: RequireAuth, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping() {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!("Readiness check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ok": false, "error": "database unreachable" })),
            )
        }
    }
}

/// Auth introspection: echoes the caller's key metadata.
pub async fn authz(auth: RequireAuth) -> impl IntoResponse {
    let key = auth.0;
    Json(json!({
        "authenticated": true,
        "key_uid": key.uid,
        "role": key.role,
        "is_admin": key.is_admin,
    }))
}
