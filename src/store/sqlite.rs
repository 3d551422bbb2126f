use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde_json::Value;

use super::schema::SCHEMA;
use super::{
    AssetFilter, EventFilter, Page, ProjectFilter, PublishFilter, RenderFilter, ShotFilter, Store,
    TaskFilter, VersionFilter,
};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// An in-memory store, mainly for tests and demos.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn parse_opt_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.map(|s| parse_datetime(&s))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn format_opt_datetime(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(format_datetime)
}

fn parse_json(s: &str) -> Value {
    serde_json::from_str(s).unwrap_or_else(|e| {
        tracing::error!("Invalid JSON in database: '{}' - {}", s, e);
        Value::Object(serde_json::Map::new())
    })
}

/// Maps a constraint violation to a Conflict carrying `message`; everything
/// else stays a database error.
fn constraint_err(err: rusqlite::Error, message: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::Conflict(message.to_string())
        }
        _ => Error::Database(err),
    }
}

const PROJECT_COLS: &str = "uid, name, created_at, updated_at, deleted_at";
const ASSET_COLS: &str = "uid, project_uid, name, type, created_at, updated_at, deleted_at";
const SHOT_COLS: &str = "uid, project_uid, seq, shot, frame_in, frame_out, fps, colorspace, \
                         created_at, updated_at, deleted_at";
const TASK_COLS: &str = "uid, project_uid, parent_type, parent_uid, name, assignee, status, \
                         created_at, updated_at, deleted_at";
const VERSION_COLS: &str = "uid, project_uid, task_uid, vnum, status, created_by, created_at, \
                            updated_at, deleted_at";
const PUBLISH_COLS: &str = "uid, project_uid, version_uid, type, representation, path, meta, \
                            created_at, updated_at, deleted_at";
const RENDER_COLS: &str = "uid, project_uid, context, adapter, status, logs, submitted_at, \
                           created_at, updated_at, deleted_at";
const EVENT_COLS: &str = "uid, project_uid, kind, payload, created_at, updated_at, deleted_at";
const API_KEY_COLS: &str = "uid, key_hash, key_lookup, description, role, is_admin, expires_at, \
                            created_at, last_used_at";

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        uid: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
        updated_at: parse_datetime(&row.get::<_, String>(3)?),
        deleted_at: parse_opt_datetime(row.get(4)?),
    })
}

fn asset_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Asset> {
    Ok(Asset {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        name: row.get(2)?,
        kind: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
        deleted_at: parse_opt_datetime(row.get(6)?),
    })
}

fn shot_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shot> {
    Ok(Shot {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        seq: row.get(2)?,
        shot: row.get(3)?,
        frame_in: row.get(4)?,
        frame_out: row.get(5)?,
        fps: row.get(6)?,
        colorspace: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
        updated_at: parse_datetime(&row.get::<_, String>(9)?),
        deleted_at: parse_opt_datetime(row.get(10)?),
    })
}

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let parent_type: String = row.get(2)?;
    let kind: ParentKind = parent_type.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Task {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        parent: ParentRef::new(kind, row.get(3)?),
        name: row.get(4)?,
        assignee: row.get(5)?,
        status: row.get::<_, String>(6)?.parse().unwrap_or_else(|e| {
            tracing::error!("Invalid task status in database: {}", e);
            TaskStatus::default()
        }),
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
        deleted_at: parse_opt_datetime(row.get(9)?),
    })
}

fn version_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Version> {
    Ok(Version {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        task_uid: row.get(2)?,
        vnum: row.get(3)?,
        status: row.get::<_, String>(4)?.parse().unwrap_or_else(|e| {
            tracing::error!("Invalid version status in database: {}", e);
            VersionStatus::default()
        }),
        created_by: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
        deleted_at: parse_opt_datetime(row.get(8)?),
    })
}

fn publish_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Publish> {
    let kind: PublishKind = row.get::<_, String>(3)?.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;
    let representation = row
        .get::<_, Option<String>>(4)?
        .map(|r| r.parse::<Representation>())
        .transpose()
        .map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?;

    Ok(Publish {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        version_uid: row.get(2)?,
        kind,
        representation,
        path: row.get(5)?,
        meta: parse_json(&row.get::<_, String>(6)?),
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
        deleted_at: parse_opt_datetime(row.get(9)?),
    })
}

fn render_job_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RenderJob> {
    Ok(RenderJob {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        context: parse_json(&row.get::<_, String>(2)?),
        adapter: row.get(3)?,
        status: row.get::<_, String>(4)?.parse().unwrap_or_else(|e| {
            tracing::error!("Invalid render status in database: {}", e);
            RenderStatus::default()
        }),
        logs: row.get(5)?,
        submitted_at: parse_datetime(&row.get::<_, String>(6)?),
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
        deleted_at: parse_opt_datetime(row.get(9)?),
    })
}

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        uid: row.get(0)?,
        project_uid: row.get(1)?,
        kind: row.get(2)?,
        payload: parse_json(&row.get::<_, String>(3)?),
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
        deleted_at: parse_opt_datetime(row.get(6)?),
    })
}

fn api_key_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ApiKey> {
    Ok(ApiKey {
        uid: row.get(0)?,
        key_hash: row.get(1)?,
        key_lookup: row.get(2)?,
        description: row.get(3)?,
        role: row.get(4)?,
        is_admin: row.get(5)?,
        expires_at: parse_opt_datetime(row.get(6)?),
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        last_used_at: parse_opt_datetime(row.get(8)?),
    })
}

impl SqliteStore {
    fn get_one<T>(
        &self,
        sql: &str,
        ident: &str,
        from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        let conn = self.conn();
        conn.query_row(sql, params![ident], from_row)
            .optional()
            .map_err(Error::from)
    }

    fn soft_delete(&self, table: &str, uid: &str) -> Result<bool> {
        let now = format_datetime(&Utc::now());
        let rows = self.conn().execute(
            &format!(
                "UPDATE {table} SET deleted_at = ?1, updated_at = ?1
                 WHERE uid = ?2 AND deleted_at IS NULL"
            ),
            params![now, uid],
        )?;
        Ok(rows > 0)
    }

    fn list<T>(
        &self,
        table: &str,
        cols: &str,
        where_sql: &str,
        order_sql: &str,
        mut args: Vec<SqlValue>,
        page: Page,
        from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<(Vec<T>, i64)> {
        let conn = self.conn();

        // Total count from the same predicate, not the paginated subset.
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {table}{where_sql}"),
            params_from_iter(args.clone()),
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {cols} FROM {table}{where_sql}{order_sql} LIMIT ? OFFSET ?"
        ))?;
        args.push(SqlValue::from(page.limit));
        args.push(SqlValue::from(page.offset));

        let rows = stmt.query_map(params_from_iter(args), from_row)?;
        let items = rows
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)?;
        Ok((items, total))
    }
}

/// Appends `AND column = ?` (or a LIKE clause) for each present filter value.
struct WhereBuilder {
    sql: String,
    args: Vec<SqlValue>,
}

impl WhereBuilder {
    fn new(include_deleted: bool) -> Self {
        let mut sql = String::from(" WHERE 1=1");
        if !include_deleted {
            sql.push_str(" AND deleted_at IS NULL");
        }
        Self {
            sql,
            args: Vec::new(),
        }
    }

    fn eq(&mut self, column: &str, value: Option<impl Into<SqlValue>>) {
        if let Some(value) = value {
            self.sql.push_str(&format!(" AND {column} = ?"));
            self.args.push(value.into());
        }
    }

    fn like(&mut self, column: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.sql.push_str(&format!(" AND {column} LIKE ?"));
            self.args.push(SqlValue::from(format!("%{value}%")));
        }
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn ping(&self) -> Result<()> {
        self.conn()
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    // Project operations

    fn create_project(&self, project: &Project) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO projects (uid, name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    project.uid,
                    project.name,
                    format_datetime(&project.created_at),
                    format_datetime(&project.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "project with this name or UID already exists"))?;
        Ok(())
    }

    fn get_project(&self, uid: &str) -> Result<Option<Project>> {
        self.get_one(
            &format!("SELECT {PROJECT_COLS} FROM projects WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            project_from_row,
        )
    }

    fn get_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        self.get_one(
            &format!("SELECT {PROJECT_COLS} FROM projects WHERE name = ?1 AND deleted_at IS NULL"),
            name,
            project_from_row,
        )
    }

    fn list_projects(&self, filter: &ProjectFilter, page: Page) -> Result<(Vec<Project>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.like("name", filter.name.as_ref());
        self.list(
            "projects",
            PROJECT_COLS,
            &w.sql,
            " ORDER BY name ASC",
            w.args,
            page,
            project_from_row,
        )
    }

    fn update_project(&self, project: &Project) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE projects SET name = ?2, updated_at = ?3 WHERE uid = ?1",
                params![
                    project.uid,
                    project.name,
                    format_datetime(&project.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "project with this name already exists"))?;
        Ok(())
    }

    fn delete_project(&self, uid: &str) -> Result<bool> {
        self.soft_delete("projects", uid)
    }

    fn project_overview(&self, uid: &str) -> Result<Option<ProjectOverview>> {
        let Some(project) = self.get_project(uid)? else {
            return Ok(None);
        };
        let conn = self.conn();

        let shots: i64 = conn.query_row(
            "SELECT COUNT(*) FROM shots WHERE project_uid = ?1 AND deleted_at IS NULL",
            params![project.uid],
            |row| row.get(0),
        )?;
        let tasks: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE project_uid = ?1 AND deleted_at IS NULL",
            params![project.uid],
            |row| row.get(0),
        )?;

        Ok(Some(ProjectOverview {
            uid: project.uid,
            name: project.name,
            counts: OverviewCounts { shots, tasks },
        }))
    }

    // Asset operations

    fn create_asset(&self, asset: &Asset) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO assets (uid, project_uid, name, type, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    asset.uid,
                    asset.project_uid,
                    asset.name,
                    asset.kind,
                    format_datetime(&asset.created_at),
                    format_datetime(&asset.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "asset with this name already exists in the project"))?;
        Ok(())
    }

    fn get_asset(&self, uid: &str) -> Result<Option<Asset>> {
        self.get_one(
            &format!("SELECT {ASSET_COLS} FROM assets WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            asset_from_row,
        )
    }

    fn get_asset_by_name(&self, name: &str) -> Result<Option<Asset>> {
        self.get_one(
            &format!(
                "SELECT {ASSET_COLS} FROM assets
                 WHERE name = ?1 AND deleted_at IS NULL
                 ORDER BY created_at ASC LIMIT 1"
            ),
            name,
            asset_from_row,
        )
    }

    fn list_assets(&self, filter: &AssetFilter, page: Page) -> Result<(Vec<Asset>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.like("name", filter.name.as_ref());
        w.eq("type", filter.kind.clone());
        self.list(
            "assets",
            ASSET_COLS,
            &w.sql,
            " ORDER BY name ASC",
            w.args,
            page,
            asset_from_row,
        )
    }

    fn update_asset(&self, asset: &Asset) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE assets SET project_uid = ?2, name = ?3, type = ?4, updated_at = ?5
                 WHERE uid = ?1",
                params![
                    asset.uid,
                    asset.project_uid,
                    asset.name,
                    asset.kind,
                    format_datetime(&asset.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "asset with this name already exists in the project"))?;
        Ok(())
    }

    fn delete_asset(&self, uid: &str) -> Result<bool> {
        self.soft_delete("assets", uid)
    }

    // Shot operations

    fn create_shot(&self, shot: &Shot) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO shots (uid, project_uid, seq, shot, frame_in, frame_out, fps,
                                    colorspace, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    shot.uid,
                    shot.project_uid,
                    shot.seq,
                    shot.shot,
                    shot.frame_in,
                    shot.frame_out,
                    shot.fps,
                    shot.colorspace,
                    format_datetime(&shot.created_at),
                    format_datetime(&shot.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "shot code already exists in the project"))?;
        Ok(())
    }

    fn get_shot(&self, uid: &str) -> Result<Option<Shot>> {
        self.get_one(
            &format!("SELECT {SHOT_COLS} FROM shots WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            shot_from_row,
        )
    }

    fn list_shots(&self, filter: &ShotFilter, page: Page) -> Result<(Vec<Shot>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.eq("seq", filter.seq.clone());
        w.like("shot", filter.shot.as_ref());
        if let Some((start, end)) = filter.frame_range {
            w.sql.push_str(" AND frame_in >= ? AND frame_out <= ?");
            w.args.push(SqlValue::from(start));
            w.args.push(SqlValue::from(end));
        }
        self.list(
            "shots",
            SHOT_COLS,
            &w.sql,
            " ORDER BY seq ASC, shot ASC",
            w.args,
            page,
            shot_from_row,
        )
    }

    fn update_shot(&self, shot: &Shot) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE shots SET project_uid = ?2, seq = ?3, shot = ?4, frame_in = ?5,
                                  frame_out = ?6, fps = ?7, colorspace = ?8, updated_at = ?9
                 WHERE uid = ?1",
                params![
                    shot.uid,
                    shot.project_uid,
                    shot.seq,
                    shot.shot,
                    shot.frame_in,
                    shot.frame_out,
                    shot.fps,
                    shot.colorspace,
                    format_datetime(&shot.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "shot update violates a constraint"))?;
        Ok(())
    }

    fn delete_shot(&self, uid: &str) -> Result<bool> {
        self.soft_delete("shots", uid)
    }

    // Task operations

    fn create_task_with_version(&self, task: &Task, version: &Version) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO tasks (uid, project_uid, parent_type, parent_uid, name, assignee,
                                status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.uid,
                task.project_uid,
                task.parent.kind().as_str(),
                task.parent.uid(),
                task.name,
                task.assignee,
                task.status.as_str(),
                format_datetime(&task.created_at),
                format_datetime(&task.updated_at),
            ],
        )
        .map_err(|e| constraint_err(e, "task violates a database constraint"))?;

        tx.execute(
            "INSERT INTO versions (uid, project_uid, task_uid, vnum, status, created_by,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                version.uid,
                version.project_uid,
                version.task_uid,
                version.vnum,
                version.status.as_str(),
                version.created_by,
                format_datetime(&version.created_at),
                format_datetime(&version.updated_at),
            ],
        )
        .map_err(|e| constraint_err(e, "initial version violates a database constraint"))?;

        // Dropping the transaction without this rolls back both inserts.
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, uid: &str) -> Result<Option<Task>> {
        self.get_one(
            &format!("SELECT {TASK_COLS} FROM tasks WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            task_from_row,
        )
    }

    fn get_task_by_name(&self, name: &str) -> Result<Option<Task>> {
        self.get_one(
            &format!(
                "SELECT {TASK_COLS} FROM tasks
                 WHERE name = ?1 AND deleted_at IS NULL
                 ORDER BY created_at ASC LIMIT 1"
            ),
            name,
            task_from_row,
        )
    }

    fn list_tasks(&self, filter: &TaskFilter, page: Page) -> Result<(Vec<Task>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.eq(
            "parent_type",
            filter.parent_kind.map(|k| k.as_str().to_string()),
        );
        w.eq("parent_uid", filter.parent_uid.clone());
        w.like("name", filter.name.as_ref());
        w.eq("assignee", filter.assignee.clone());
        w.eq("status", filter.status.map(|s| s.as_str().to_string()));
        self.list(
            "tasks",
            TASK_COLS,
            &w.sql,
            " ORDER BY created_at DESC",
            w.args,
            page,
            task_from_row,
        )
    }

    fn list_task_versions(
        &self,
        filter: &VersionFilter,
        page: Page,
    ) -> Result<(Vec<Version>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("task_uid", filter.task_uid.clone());
        w.eq("vnum", filter.vnum);
        w.eq("status", filter.status.map(|s| s.as_str().to_string()));
        w.eq("created_by", filter.created_by.clone());
        self.list(
            "versions",
            VERSION_COLS,
            &w.sql,
            " ORDER BY vnum DESC, created_at DESC",
            w.args,
            page,
            version_from_row,
        )
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE tasks SET project_uid = ?2, parent_type = ?3, parent_uid = ?4,
                                  name = ?5, assignee = ?6, status = ?7, updated_at = ?8
                 WHERE uid = ?1",
                params![
                    task.uid,
                    task.project_uid,
                    task.parent.kind().as_str(),
                    task.parent.uid(),
                    task.name,
                    task.assignee,
                    task.status.as_str(),
                    format_datetime(&task.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "task update violates a constraint"))?;
        Ok(())
    }

    fn delete_task(&self, uid: &str) -> Result<bool> {
        self.soft_delete("tasks", uid)
    }

    // Version operations

    fn create_version_with_publish(
        &self,
        version: &Version,
        publish: Option<&Publish>,
    ) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO versions (uid, project_uid, task_uid, vnum, status, created_by,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                version.uid,
                version.project_uid,
                version.task_uid,
                version.vnum,
                version.status.as_str(),
                version.created_by,
                format_datetime(&version.created_at),
                format_datetime(&version.updated_at),
            ],
        )
        .map_err(|e| constraint_err(e, "version number already exists for this task"))?;

        if let Some(publish) = publish {
            tx.execute(
                "INSERT INTO publishes (uid, project_uid, version_uid, type, representation,
                                        path, meta, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    publish.uid,
                    publish.project_uid,
                    publish.version_uid,
                    publish.kind.as_str(),
                    publish.representation.map(|r| r.as_str()),
                    publish.path,
                    publish.meta.to_string(),
                    format_datetime(&publish.created_at),
                    format_datetime(&publish.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "publish violates a database constraint"))?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_version(&self, uid: &str) -> Result<Option<Version>> {
        self.get_one(
            &format!("SELECT {VERSION_COLS} FROM versions WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            version_from_row,
        )
    }

    fn next_vnum(&self, task_uid: &str) -> Result<i64> {
        // Includes soft-deleted versions: vnums are never reused.
        let next: i64 = self.conn().query_row(
            "SELECT COALESCE(MAX(vnum), 0) + 1 FROM versions WHERE task_uid = ?1",
            params![task_uid],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    fn list_versions(&self, filter: &VersionFilter, page: Page) -> Result<(Vec<Version>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.eq("task_uid", filter.task_uid.clone());
        w.eq("vnum", filter.vnum);
        w.eq("status", filter.status.map(|s| s.as_str().to_string()));
        w.eq("created_by", filter.created_by.clone());
        self.list(
            "versions",
            VERSION_COLS,
            &w.sql,
            " ORDER BY created_at DESC",
            w.args,
            page,
            version_from_row,
        )
    }

    fn update_version(&self, version: &Version) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE versions SET project_uid = ?2, task_uid = ?3, status = ?4,
                                     created_by = ?5, updated_at = ?6
                 WHERE uid = ?1",
                params![
                    version.uid,
                    version.project_uid,
                    version.task_uid,
                    version.status.as_str(),
                    version.created_by,
                    format_datetime(&version.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "version update violates a constraint"))?;
        Ok(())
    }

    fn delete_version(&self, uid: &str) -> Result<bool> {
        self.soft_delete("versions", uid)
    }

    // Publish operations

    fn create_publish(&self, publish: &Publish) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO publishes (uid, project_uid, version_uid, type, representation,
                                        path, meta, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    publish.uid,
                    publish.project_uid,
                    publish.version_uid,
                    publish.kind.as_str(),
                    publish.representation.map(|r| r.as_str()),
                    publish.path,
                    publish.meta.to_string(),
                    format_datetime(&publish.created_at),
                    format_datetime(&publish.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "publish violates a database constraint"))?;
        Ok(())
    }

    fn get_publish(&self, uid: &str) -> Result<Option<Publish>> {
        self.get_one(
            &format!("SELECT {PUBLISH_COLS} FROM publishes WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            publish_from_row,
        )
    }

    fn list_publishes(&self, filter: &PublishFilter, page: Page) -> Result<(Vec<Publish>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.eq("version_uid", filter.version_uid.clone());
        w.eq("type", filter.kind.map(|k| k.as_str().to_string()));
        w.eq(
            "representation",
            filter.representation.map(|r| r.as_str().to_string()),
        );
        w.like("path", filter.path.as_ref());
        self.list(
            "publishes",
            PUBLISH_COLS,
            &w.sql,
            " ORDER BY created_at DESC",
            w.args,
            page,
            publish_from_row,
        )
    }

    fn update_publish(&self, publish: &Publish) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE publishes SET type = ?2, representation = ?3, path = ?4, meta = ?5,
                                      updated_at = ?6
                 WHERE uid = ?1",
                params![
                    publish.uid,
                    publish.kind.as_str(),
                    publish.representation.map(|r| r.as_str()),
                    publish.path,
                    publish.meta.to_string(),
                    format_datetime(&publish.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "publish update violates a constraint"))?;
        Ok(())
    }

    fn delete_publish(&self, uid: &str) -> Result<bool> {
        self.soft_delete("publishes", uid)
    }

    // Render job operations

    fn create_render_job(&self, job: &RenderJob) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO render_jobs (uid, project_uid, context, adapter, status, logs,
                                          submitted_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    job.uid,
                    job.project_uid,
                    job.context.to_string(),
                    job.adapter,
                    job.status.as_str(),
                    job.logs,
                    format_datetime(&job.submitted_at),
                    format_datetime(&job.created_at),
                    format_datetime(&job.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "render job violates a database constraint"))?;
        Ok(())
    }

    fn get_render_job(&self, uid: &str) -> Result<Option<RenderJob>> {
        self.get_one(
            &format!(
                "SELECT {RENDER_COLS} FROM render_jobs WHERE uid = ?1 AND deleted_at IS NULL"
            ),
            uid,
            render_job_from_row,
        )
    }

    fn list_render_jobs(&self, filter: &RenderFilter, page: Page) -> Result<(Vec<RenderJob>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.eq("adapter", filter.adapter.clone());
        w.eq("status", filter.status.map(|s| s.as_str().to_string()));
        self.list(
            "render_jobs",
            RENDER_COLS,
            &w.sql,
            " ORDER BY submitted_at DESC",
            w.args,
            page,
            render_job_from_row,
        )
    }

    fn update_render_job(&self, job: &RenderJob) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE render_jobs SET project_uid = ?2, context = ?3, adapter = ?4,
                                        status = ?5, logs = ?6, updated_at = ?7
                 WHERE uid = ?1",
                params![
                    job.uid,
                    job.project_uid,
                    job.context.to_string(),
                    job.adapter,
                    job.status.as_str(),
                    job.logs,
                    format_datetime(&job.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "render job update violates a constraint"))?;
        Ok(())
    }

    fn delete_render_job(&self, uid: &str) -> Result<bool> {
        self.soft_delete("render_jobs", uid)
    }

    // Event operations

    fn create_event(&self, event: &Event) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO events (uid, project_uid, kind, payload, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    event.uid,
                    event.project_uid,
                    event.kind,
                    event.payload.to_string(),
                    format_datetime(&event.created_at),
                    format_datetime(&event.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "event violates a database constraint"))?;
        Ok(())
    }

    fn get_event(&self, uid: &str) -> Result<Option<Event>> {
        self.get_one(
            &format!("SELECT {EVENT_COLS} FROM events WHERE uid = ?1 AND deleted_at IS NULL"),
            uid,
            event_from_row,
        )
    }

    fn list_events(&self, filter: &EventFilter, page: Page) -> Result<(Vec<Event>, i64)> {
        let mut w = WhereBuilder::new(filter.include_deleted);
        w.eq("uid", filter.uid.clone());
        w.eq("project_uid", filter.project_uid.clone());
        w.eq("kind", filter.kind.clone());
        self.list(
            "events",
            EVENT_COLS,
            &w.sql,
            " ORDER BY created_at DESC",
            w.args,
            page,
            event_from_row,
        )
    }

    fn update_event(&self, event: &Event) -> Result<()> {
        self.conn()
            .execute(
                "UPDATE events SET project_uid = ?2, kind = ?3, payload = ?4, updated_at = ?5
                 WHERE uid = ?1",
                params![
                    event.uid,
                    event.project_uid,
                    event.kind,
                    event.payload.to_string(),
                    format_datetime(&event.updated_at),
                ],
            )
            .map_err(|e| constraint_err(e, "event update violates a constraint"))?;
        Ok(())
    }

    fn delete_event(&self, uid: &str) -> Result<bool> {
        self.soft_delete("events", uid)
    }

    // API key operations

    fn create_api_key(&self, key: &ApiKey) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO api_keys (uid, key_hash, key_lookup, description, role, is_admin,
                                       expires_at, created_at, last_used_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    key.uid,
                    key.key_hash,
                    key.key_lookup,
                    key.description,
                    key.role,
                    key.is_admin,
                    format_opt_datetime(&key.expires_at),
                    format_datetime(&key.created_at),
                    format_opt_datetime(&key.last_used_at),
                ],
            )
            .map_err(|e| constraint_err(e, "api key with this lookup already exists"))?;
        Ok(())
    }

    fn get_api_key(&self, uid: &str) -> Result<Option<ApiKey>> {
        self.get_one(
            &format!("SELECT {API_KEY_COLS} FROM api_keys WHERE uid = ?1"),
            uid,
            api_key_from_row,
        )
    }

    fn get_api_key_by_lookup(&self, lookup: &str) -> Result<Option<ApiKey>> {
        self.get_one(
            &format!("SELECT {API_KEY_COLS} FROM api_keys WHERE key_lookup = ?1"),
            lookup,
            api_key_from_row,
        )
    }

    fn list_api_keys(&self, page: Page) -> Result<(Vec<ApiKey>, i64)> {
        self.list(
            "api_keys",
            API_KEY_COLS,
            "",
            " ORDER BY created_at DESC",
            Vec::new(),
            page,
            api_key_from_row,
        )
    }

    fn update_api_key_last_used(&self, uid: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE api_keys SET last_used_at = ?2 WHERE uid = ?1",
            params![uid, format_datetime(&Utc::now())],
        )?;
        Ok(())
    }

    fn delete_api_key(&self, uid: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM api_keys WHERE uid = ?1", params![uid])?;
        Ok(rows > 0)
    }

    fn has_admin_key(&self) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM api_keys WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
