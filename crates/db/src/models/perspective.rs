//! Perspective group, field and value models.

use labelhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named, creator-owned bag of typed perspective fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PerspectiveProject {
    pub id: DbId,
    pub name: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One typed field within a perspective group.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Perspective {
    pub id: DbId,
    pub perspective_project_id: DbId,
    pub name: String,
    pub kind: String,
    pub options: String,
}

/// A recorded value: one member's answer to one perspective field.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PerspectiveMemberValue {
    pub id: DbId,
    pub member_id: DbId,
    pub perspective_id: DbId,
    pub value: String,
}

/// A value row joined with its owning member's user and project, used for
/// family-wide aggregation and conjunctive filtering.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberValueDetail {
    pub member_id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub perspective_id: DbId,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePerspectiveItem {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub options: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePerspectiveGroup {
    pub name: String,
    #[serde(default)]
    pub items: Vec<CreatePerspectiveItem>,
}
