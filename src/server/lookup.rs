use crate::error::Error;
use crate::server::response::ApiError;
use crate::store::Store;
use crate::types::{Asset, Event, Project, Publish, RenderJob, Shot, Task, Version};

// Projects, assets, and tasks resolve by UID first, then by name as a
// convenience for humans. Everything else is UID-only.

pub fn resolve_project(store: &dyn Store, ident: &str) -> Result<Project, ApiError> {
    if let Some(project) = store.get_project(ident)? {
        return Ok(project);
    }
    store
        .get_project_by_name(ident)?
        .ok_or_else(|| Error::not_found("project", ident).into())
}

pub fn resolve_asset(store: &dyn Store, ident: &str) -> Result<Asset, ApiError> {
    if let Some(asset) = store.get_asset(ident)? {
        return Ok(asset);
    }
    store
        .get_asset_by_name(ident)?
        .ok_or_else(|| Error::not_found("asset", ident).into())
}

pub fn resolve_task(store: &dyn Store, ident: &str) -> Result<Task, ApiError> {
    if let Some(task) = store.get_task(ident)? {
        return Ok(task);
    }
    store
        .get_task_by_name(ident)?
        .ok_or_else(|| Error::not_found("task", ident).into())
}

pub fn resolve_shot(store: &dyn Store, uid: &str) -> Result<Shot, ApiError> {
    store
        .get_shot(uid)?
        .ok_or_else(|| Error::not_found("shot", uid).into())
}

pub fn resolve_version(store: &dyn Store, uid: &str) -> Result<Version, ApiError> {
    store
        .get_version(uid)?
        .ok_or_else(|| Error::not_found("version", uid).into())
}

pub fn resolve_publish(store: &dyn Store, uid: &str) -> Result<Publish, ApiError> {
    store
        .get_publish(uid)?
        .ok_or_else(|| Error::not_found("publish", uid).into())
}

pub fn resolve_render_job(store: &dyn Store, uid: &str) -> Result<RenderJob, ApiError> {
    store
        .get_render_job(uid)?
        .ok_or_else(|| Error::not_found("render job", uid).into())
}

pub fn resolve_event(store: &dyn Store, uid: &str) -> Result<Event, ApiError> {
    store
        .get_event(uid)?
        .ok_or_else(|| Error::not_found("event", uid).into())
}
