//! User group model.

use labelhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
}

/// A user belonging to a group, joined with their account details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupMember {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddGroupMember {
    pub user_id: DbId,
}
