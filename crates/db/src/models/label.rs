//! Category label types and category annotations.

use labelhub_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A label type definition, scoped to the version-stamped project that
/// created it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryType {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryType {
    pub text: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

fn default_background() -> String {
    "#209CEE".to_string()
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

/// A category annotation: one user's label vote on one example, stamped with
/// the project version active at creation time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub example_id: DbId,
    pub user_id: DbId,
    pub category_type_id: DbId,
    pub project_version: VersionNumber,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub category_type_id: DbId,
}

/// Aggregated vote count for one label on one example under one version.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExampleLabelCount {
    pub example_id: DbId,
    pub category_type_id: DbId,
    pub label_text: String,
    pub background_color: String,
    pub count: i64,
}

/// A user who annotated an example.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct AnnotatingUser {
    pub example_id: DbId,
    pub user_id: DbId,
    pub username: String,
}

/// One annotation joined with its user, example and label, for the
/// annotator report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnnotationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub example_id: DbId,
    pub example_text: String,
    pub label_id: DbId,
    pub label_text: String,
    pub background_color: String,
    pub project_version: VersionNumber,
    pub created_at: Timestamp,
}
