use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::ratelimit::{RateLimiter, rate_limit};
use super::{assets, events, keys, projects, publishes, renders, shots, system, tasks, versions};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { store, limiter }
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

/// The full API surface minus the root banner. Built once per mount so it
/// can serve both the legacy unversioned prefix and `/v1`.
fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/projects/{uid}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/projects/{uid}/overview",
            get(projects::get_project_overview),
        )
        .route(
            "/assets",
            post(assets::create_asset).get(assets::list_assets),
        )
        .route(
            "/assets/{uid}",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/assets/{uid}/tasks", get(assets::list_asset_tasks))
        .route("/shots", post(shots::create_shot).get(shots::list_shots))
        .route(
            "/shots/{uid}",
            get(shots::get_shot)
                .patch(shots::update_shot)
                .delete(shots::delete_shot),
        )
        .route("/tasks", post(tasks::create_task).get(tasks::list_tasks))
        .route(
            "/tasks/{uid}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/{uid}/versions", get(tasks::list_task_versions))
        .route(
            "/versions",
            post(versions::create_version).get(versions::list_versions),
        )
        .route(
            "/versions/{uid}",
            get(versions::get_version)
                .patch(versions::update_version)
                .delete(versions::delete_version),
        )
        .route(
            "/publishes",
            post(publishes::create_publish).get(publishes::list_publishes),
        )
        .route(
            "/publishes/{uid}",
            get(publishes::get_publish)
                .patch(publishes::update_publish)
                .delete(publishes::delete_publish),
        )
        .route(
            "/renders",
            post(renders::create_render_job).get(renders::list_render_jobs),
        )
        .route(
            "/renders/{uid}",
            get(renders::get_render_job)
                .patch(renders::update_render_job)
                .delete(renders::delete_render_job),
        )
        .route(
            "/events",
            post(events::create_event).get(events::list_events),
        )
        .route(
            "/events/{uid}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/keys", post(keys::create_key).get(keys::list_keys))
        .route("/keys/{uid}", delete(keys::delete_key))
        .route("/healthz", get(system::healthz))
        .route("/readyz", get(system::readyz))
        .route("/authz", get(system::authz))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(system::root))
        .merge(api_router())
        .nest("/v1", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
