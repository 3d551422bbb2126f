use serde::Deserialize;
use serde_json::Value;

use crate::types::{ParentKind, PublishKind, RenderStatus, Representation, TaskStatus, VersionStatus};

// Create and update payloads. Clients may supply their own UID on create;
// one is generated when omitted.

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub project_uid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateShotRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub project_uid: String,
    pub seq: String,
    pub shot: String,
    pub frame_in: i64,
    pub frame_out: i64,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub colorspace: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateShotRequest {
    #[serde(default)]
    pub seq: Option<String>,
    #[serde(default)]
    pub shot: Option<String>,
    #[serde(default)]
    pub frame_in: Option<i64>,
    #[serde(default)]
    pub frame_out: Option<i64>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub colorspace: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub project_uid: String,
    pub parent_type: ParentKind,
    pub parent_uid: String,
    pub name: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Recorded on the seeded first version. Defaults to the assignee.
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub project_uid: String,
    pub task_uid: String,
    #[serde(default)]
    pub vnum: Option<i64>,
    #[serde(default)]
    pub status: Option<VersionStatus>,
    #[serde(default)]
    pub created_by: Option<String>,
    // Publish fields, honored only with ?publish=true.
    #[serde(default, rename = "publish_type")]
    pub publish_kind: Option<PublishKind>,
    #[serde(default)]
    pub representation: Option<Representation>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVersionRequest {
    /// Re-parents the version onto another project.
    #[serde(default)]
    pub project_uid: Option<String>,
    /// Re-parents the version onto another task.
    #[serde(default)]
    pub task_uid: Option<String>,
    #[serde(default)]
    pub status: Option<VersionStatus>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePublishRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub project_uid: String,
    pub version_uid: String,
    #[serde(rename = "type")]
    pub kind: PublishKind,
    #[serde(default)]
    pub representation: Option<Representation>,
    pub path: String,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePublishRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<PublishKind>,
    #[serde(default)]
    pub representation: Option<Representation>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRenderJobRequest {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project_uid: Option<String>,
    #[serde(default)]
    pub context: Option<Value>,
    pub adapter: String,
    #[serde(default)]
    pub status: Option<RenderStatus>,
    #[serde(default)]
    pub logs: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRenderJobRequest {
    #[serde(default)]
    pub status: Option<RenderStatus>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project_uid: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `service`. A key with the `admin` role carries the
    /// admin flag.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListKeysParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

// List query parameters. Every listing accepts limit/offset and
// include_deleted on top of its own filters. Kept flat rather than
// composed: serde(flatten) breaks urlencoded number parsing.

#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListAssetsParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListShotsParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub seq: Option<String>,
    #[serde(default)]
    pub shot: Option<String>,
    /// Frame range filter in the form "START-END".
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTasksParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub parent_type: Option<ParentKind>,
    #[serde(default)]
    pub parent_uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListVersionsParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub vnum: Option<i64>,
    #[serde(default)]
    pub status: Option<VersionStatus>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateVersionParams {
    /// When true the request must carry publish fields, and the version
    /// and publish are created atomically.
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPublishesParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<PublishKind>,
    #[serde(default)]
    pub representation: Option<Representation>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRenderJobsParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(default)]
    pub status: Option<RenderStatus>,
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListEventsParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}
