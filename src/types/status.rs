use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminant for a task's polymorphic parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    Asset,
    Shot,
}

impl ParentKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentKind::Asset => "asset",
            ParentKind::Shot => "shot",
        }
    }
}

impl FromStr for ParentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(ParentKind::Asset),
            "shot" => Ok(ParentKind::Shot),
            other => Err(format!("invalid parent type '{other}'")),
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "WIP")]
    Wip,
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "DONE")]
    Done,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Wip => "WIP",
            TaskStatus::Ready => "READY",
            TaskStatus::Hold => "HOLD",
            TaskStatus::Done => "DONE",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WIP" => Ok(TaskStatus::Wip),
            "READY" => Ok(TaskStatus::Ready),
            "HOLD" => Ok(TaskStatus::Hold),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(format!("invalid task status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Draft,
    Review,
    Approved,
    Rejected,
}

impl VersionStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::Review => "review",
            VersionStatus::Approved => "approved",
            VersionStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for VersionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(VersionStatus::Draft),
            "review" => Ok(VersionStatus::Review),
            "approved" => Ok(VersionStatus::Approved),
            "rejected" => Ok(VersionStatus::Rejected),
            other => Err(format!("invalid version status '{other}'")),
        }
    }
}

/// What a publish contains, e.g. geometry or a comp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishKind {
    Geo,
    Rig,
    Comp,
    Fx,
    Layout,
    Prep,
    Tex,
}

impl PublishKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishKind::Geo => "geo",
            PublishKind::Rig => "rig",
            PublishKind::Comp => "comp",
            PublishKind::Fx => "fx",
            PublishKind::Layout => "layout",
            PublishKind::Prep => "prep",
            PublishKind::Tex => "tex",
        }
    }
}

impl FromStr for PublishKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "geo" => Ok(PublishKind::Geo),
            "rig" => Ok(PublishKind::Rig),
            "comp" => Ok(PublishKind::Comp),
            "fx" => Ok(PublishKind::Fx),
            "layout" => Ok(PublishKind::Layout),
            "prep" => Ok(PublishKind::Prep),
            "tex" => Ok(PublishKind::Tex),
            other => Err(format!("invalid publish type '{other}'")),
        }
    }
}

/// On-disk file format of a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Usd,
    Abc,
    Exr,
    Vdb,
    Mov,
    Png,
}

impl Representation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Usd => "usd",
            Representation::Abc => "abc",
            Representation::Exr => "exr",
            Representation::Vdb => "vdb",
            Representation::Mov => "mov",
            Representation::Png => "png",
        }
    }
}

impl FromStr for Representation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usd" => Ok(Representation::Usd),
            "abc" => Ok(Representation::Abc),
            "exr" => Ok(Representation::Exr),
            "vdb" => Ok(Representation::Vdb),
            "mov" => Ok(Representation::Mov),
            "png" => Ok(Representation::Png),
            other => Err(format!("invalid representation '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    #[default]
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl RenderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Queued => "queued",
            RenderStatus::Running => "running",
            RenderStatus::Succeeded => "succeeded",
            RenderStatus::Failed => "failed",
        }
    }
}

impl FromStr for RenderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(RenderStatus::Queued),
            "running" => Ok(RenderStatus::Running),
            "succeeded" => Ok(RenderStatus::Succeeded),
            "failed" => Ok(RenderStatus::Failed),
            other => Err(format!("invalid render status '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_wire_format() {
        assert_eq!(serde_json::to_string(&TaskStatus::Wip).unwrap(), "\"WIP\"");
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"DONE\"").unwrap(),
            TaskStatus::Done
        );
    }

    #[test]
    fn test_version_status_round_trip() {
        for s in ["draft", "review", "approved", "rejected"] {
            let parsed: VersionStatus = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!("finaled".parse::<VersionStatus>().is_err());
        assert!("paused".parse::<RenderStatus>().is_err());
        assert!("sequence".parse::<ParentKind>().is_err());
        assert!("anything".parse::<PublishKind>().is_err());
        assert!("fbx".parse::<Representation>().is_err());
    }

    #[test]
    fn test_publish_enums_round_trip() {
        for s in ["geo", "rig", "comp", "fx", "layout", "prep", "tex"] {
            let parsed: PublishKind = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        for s in ["usd", "abc", "exr", "vdb", "mov", "png"] {
            let parsed: Representation = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }
}
