//! Annotatable example model and DTOs.

use labelhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An example row. Always attached to the version-family's original project;
/// `original_example_id` is set when the row was produced by cloning another
/// project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Example {
    pub id: DbId,
    pub uuid: Uuid,
    pub project_id: DbId,
    pub text: String,
    pub filename: String,
    pub meta: serde_json::Value,
    pub original_example_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExample {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default = "default_meta")]
    pub meta: serde_json::Value,
}

fn default_meta() -> serde_json::Value {
    serde_json::json!({})
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExample {
    pub text: Option<String>,
    pub filename: Option<String>,
    pub meta: Option<serde_json::Value>,
}
