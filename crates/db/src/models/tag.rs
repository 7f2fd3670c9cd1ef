//! Project tag model.

use labelhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub project_id: DbId,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub text: String,
}
