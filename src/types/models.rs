use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ParentKind, PublishKind, RenderStatus, Representation, TaskStatus, VersionStatus};

/// A task's polymorphic parent: either an asset or a shot, discriminated by
/// `parent_type` on the wire. No foreign key backs this; the referenced UID
/// is validated at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "parent_type", content = "parent_uid", rename_all = "lowercase")]
pub enum ParentRef {
    Asset(String),
    Shot(String),
}

impl ParentRef {
    #[must_use]
    pub fn kind(&self) -> ParentKind {
        match self {
            ParentRef::Asset(_) => ParentKind::Asset,
            ParentRef::Shot(_) => ParentKind::Shot,
        }
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        match self {
            ParentRef::Asset(uid) | ParentRef::Shot(uid) => uid,
        }
    }

    pub fn new(kind: ParentKind, uid: String) -> Self {
        match kind {
            ParentKind::Asset => ParentRef::Asset(uid),
            ParentKind::Shot => ParentRef::Shot(uid),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub uid: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub uid: String,
    pub project_uid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub uid: String,
    pub project_uid: String,
    pub seq: String,
    pub shot: String,
    pub frame_in: i64,
    pub frame_out: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorspace: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub uid: String,
    pub project_uid: String,
    #[serde(flatten)]
    pub parent: ParentRef,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub uid: String,
    pub project_uid: String,
    pub task_uid: String,
    pub vnum: i64,
    pub status: VersionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publish {
    pub uid: String,
    pub project_uid: String,
    pub version_uid: String,
    #[serde(rename = "type")]
    pub kind: PublishKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<Representation>,
    pub path: String,
    pub meta: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_uid: Option<String>,
    pub context: Value,
    pub adapter: String,
    pub status: RenderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_uid: Option<String>,
    pub kind: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A stored bearer credential. The raw key is shown once at creation; only
/// the argon2 hash and a short lookup prefix persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub uid: String,
    #[serde(skip)]
    pub key_hash: String,
    #[serde(skip)]
    pub key_lookup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One of: admin, td, atd, artist, producer, supervisor, service,
    /// system, client.
    pub role: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Aggregate counts for `GET /projects/{uid}/overview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOverview {
    pub uid: String,
    pub name: String,
    pub counts: OverviewCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewCounts {
    pub shots: i64,
    pub tasks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_ref_wire_format() {
        let parent = ParentRef::Shot("SHOT_AB12CD".to_string());
        let json = serde_json::to_value(&parent).unwrap();
        assert_eq!(json["parent_type"], "shot");
        assert_eq!(json["parent_uid"], "SHOT_AB12CD");

        let back: ParentRef =
            serde_json::from_value(serde_json::json!({
                "parent_type": "asset",
                "parent_uid": "ASSET_XY99ZZ"
            }))
            .unwrap();
        assert_eq!(back, ParentRef::Asset("ASSET_XY99ZZ".to_string()));
    }

    #[test]
    fn test_parent_ref_rejects_unknown_kind() {
        let result: Result<ParentRef, _> = serde_json::from_value(serde_json::json!({
            "parent_type": "sequence",
            "parent_uid": "SEQ_000000"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_serializes_parent_inline() {
        let task = Task {
            uid: "TASK_111111".to_string(),
            project_uid: "PROJ_222222".to_string(),
            parent: ParentRef::Shot("SHOT_333333".to_string()),
            name: "comp".to_string(),
            assignee: None,
            status: TaskStatus::Wip,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            deleted_at: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["parent_type"], "shot");
        assert_eq!(json["parent_uid"], "SHOT_333333");
        assert_eq!(json["status"], "WIP");
        assert!(json.get("assignee").is_none());
    }
}
