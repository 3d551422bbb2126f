mod models;
mod status;

pub use models::*;
pub use status::{ParentKind, PublishKind, RenderStatus, Representation, TaskStatus, VersionStatus};
