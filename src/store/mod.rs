mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// A page window for list operations. Bounds are validated at the API
/// boundary; the store applies them as-is.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    pub uid: Option<String>,
    /// Case-insensitive substring match.
    pub name: Option<String>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct AssetFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    /// Case-insensitive substring match.
    pub name: Option<String>,
    pub kind: Option<String>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct ShotFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    pub seq: Option<String>,
    /// Case-insensitive substring match on the shot code.
    pub shot: Option<String>,
    /// Inclusive frame window: frame_in >= start AND frame_out <= end.
    pub frame_range: Option<(i64, i64)>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    pub parent_kind: Option<ParentKind>,
    pub parent_uid: Option<String>,
    /// Case-insensitive substring match.
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct VersionFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    pub task_uid: Option<String>,
    pub vnum: Option<i64>,
    pub status: Option<VersionStatus>,
    pub created_by: Option<String>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct PublishFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    pub version_uid: Option<String>,
    pub kind: Option<PublishKind>,
    pub representation: Option<Representation>,
    /// Case-insensitive substring match.
    pub path: Option<String>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct RenderFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    pub adapter: Option<String>,
    pub status: Option<RenderStatus>,
    pub include_deleted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub uid: Option<String>,
    pub project_uid: Option<String>,
    pub kind: Option<String>,
    pub include_deleted: bool,
}

/// Store defines the database interface.
///
/// List operations return the page of rows together with the total count
/// matching the same filter predicate, so callers can paginate.
///
/// `get_*` and `list_*` exclude soft-deleted rows unless a filter opts in;
/// `delete_*` soft-deletes (sets `deleted_at`) and returns whether a live
/// row was affected.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    /// Connectivity probe for readiness checks.
    fn ping(&self) -> Result<()>;

    // Project operations
    fn create_project(&self, project: &Project) -> Result<()>;
    fn get_project(&self, uid: &str) -> Result<Option<Project>>;
    fn get_project_by_name(&self, name: &str) -> Result<Option<Project>>;
    fn list_projects(&self, filter: &ProjectFilter, page: Page) -> Result<(Vec<Project>, i64)>;
    fn update_project(&self, project: &Project) -> Result<()>;
    fn delete_project(&self, uid: &str) -> Result<bool>;
    fn project_overview(&self, uid: &str) -> Result<Option<ProjectOverview>>;

    // Asset operations
    fn create_asset(&self, asset: &Asset) -> Result<()>;
    fn get_asset(&self, uid: &str) -> Result<Option<Asset>>;
    fn get_asset_by_name(&self, name: &str) -> Result<Option<Asset>>;
    fn list_assets(&self, filter: &AssetFilter, page: Page) -> Result<(Vec<Asset>, i64)>;
    fn update_asset(&self, asset: &Asset) -> Result<()>;
    fn delete_asset(&self, uid: &str) -> Result<bool>;

    // Shot operations
    fn create_shot(&self, shot: &Shot) -> Result<()>;
    fn get_shot(&self, uid: &str) -> Result<Option<Shot>>;
    fn list_shots(&self, filter: &ShotFilter, page: Page) -> Result<(Vec<Shot>, i64)>;
    fn update_shot(&self, shot: &Shot) -> Result<()>;
    fn delete_shot(&self, uid: &str) -> Result<bool>;

    // Task operations; creation is a cascade committing the task and its
    // initial version atomically
    fn create_task_with_version(&self, task: &Task, version: &Version) -> Result<()>;
    fn get_task(&self, uid: &str) -> Result<Option<Task>>;
    fn get_task_by_name(&self, name: &str) -> Result<Option<Task>>;
    fn list_tasks(&self, filter: &TaskFilter, page: Page) -> Result<(Vec<Task>, i64)>;
    fn list_task_versions(&self, filter: &VersionFilter, page: Page)
    -> Result<(Vec<Version>, i64)>;
    fn update_task(&self, task: &Task) -> Result<()>;
    fn delete_task(&self, uid: &str) -> Result<bool>;

    // Version operations
    fn create_version_with_publish(
        &self,
        version: &Version,
        publish: Option<&Publish>,
    ) -> Result<()>;
    fn get_version(&self, uid: &str) -> Result<Option<Version>>;
    fn next_vnum(&self, task_uid: &str) -> Result<i64>;
    fn list_versions(&self, filter: &VersionFilter, page: Page) -> Result<(Vec<Version>, i64)>;
    fn update_version(&self, version: &Version) -> Result<()>;
    fn delete_version(&self, uid: &str) -> Result<bool>;

    // Publish operations
    fn create_publish(&self, publish: &Publish) -> Result<()>;
    fn get_publish(&self, uid: &str) -> Result<Option<Publish>>;
    fn list_publishes(&self, filter: &PublishFilter, page: Page) -> Result<(Vec<Publish>, i64)>;
    fn update_publish(&self, publish: &Publish) -> Result<()>;
    fn delete_publish(&self, uid: &str) -> Result<bool>;

    // Render job operations
    fn create_render_job(&self, job: &RenderJob) -> Result<()>;
    fn get_render_job(&self, uid: &str) -> Result<Option<RenderJob>>;
    fn list_render_jobs(&self, filter: &RenderFilter, page: Page) -> Result<(Vec<RenderJob>, i64)>;
    fn update_render_job(&self, job: &RenderJob) -> Result<()>;
    fn delete_render_job(&self, uid: &str) -> Result<bool>;

    // Event operations
    fn create_event(&self, event: &Event) -> Result<()>;
    fn get_event(&self, uid: &str) -> Result<Option<Event>>;
    fn list_events(&self, filter: &EventFilter, page: Page) -> Result<(Vec<Event>, i64)>;
    fn update_event(&self, event: &Event) -> Result<()>;
    fn delete_event(&self, uid: &str) -> Result<bool>;

    // API key operations; deletion is hard, a revoked credential leaves
    // no row behind
    fn create_api_key(&self, key: &ApiKey) -> Result<()>;
    fn get_api_key(&self, uid: &str) -> Result<Option<ApiKey>>;
    fn get_api_key_by_lookup(&self, lookup: &str) -> Result<Option<ApiKey>>;
    fn list_api_keys(&self, page: Page) -> Result<(Vec<ApiKey>, i64)>;
    fn update_api_key_last_used(&self, uid: &str) -> Result<()>;
    fn delete_api_key(&self, uid: &str) -> Result<bool>;
    fn has_admin_key(&self) -> Result<bool>;
}
