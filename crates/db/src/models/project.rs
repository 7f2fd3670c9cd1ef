//! Project entity model and DTOs.

use labelhub_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `original_project_id` is NULL for the root of a version-family; examples
/// and label types always belong to that root.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub guideline: String,
    pub project_type: String,
    pub random_order: bool,
    pub collaborative_annotation: bool,
    pub single_class_classification: bool,
    pub allow_member_to_create_label_type: bool,
    pub allow_overlapping: bool,
    pub grapheme_mode: bool,
    pub use_relation: bool,
    pub discrepancy_active: bool,
    pub discrepancy_percentage: f64,
    pub perspective_project_id: Option<DbId>,
    pub closed: bool,
    pub version: VersionNumber,
    pub original_project_id: Option<DbId>,
    pub is_current_version: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Id of the version-family's root: the original project, or self.
    pub fn original_id(&self) -> DbId {
        self.original_project_id.unwrap_or(self.id)
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guideline: String,
    pub project_type: String,
    #[serde(default)]
    pub random_order: bool,
    #[serde(default)]
    pub collaborative_annotation: bool,
    #[serde(default)]
    pub single_class_classification: bool,
    #[serde(default)]
    pub allow_member_to_create_label_type: bool,
    #[serde(default)]
    pub allow_overlapping: bool,
    #[serde(default)]
    pub grapheme_mode: bool,
    #[serde(default)]
    pub use_relation: bool,
    #[serde(default)]
    pub discrepancy_active: bool,
    #[serde(default)]
    pub discrepancy_percentage: f64,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub guideline: Option<String>,
    pub random_order: Option<bool>,
    pub collaborative_annotation: Option<bool>,
    pub single_class_classification: Option<bool>,
    pub allow_member_to_create_label_type: Option<bool>,
    pub allow_overlapping: Option<bool>,
    pub grapheme_mode: Option<bool>,
    pub use_relation: Option<bool>,
    pub discrepancy_active: Option<bool>,
    pub discrepancy_percentage: Option<f64>,
}
