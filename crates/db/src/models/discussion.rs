//! Discussion chat room and message models.

use labelhub_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat room, stamped with the project version active at creation but
/// queryable across the whole version-family.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Discussion {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub created_by: DbId,
    pub status: String,
    pub project_version: VersionNumber,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A message joined with its sender's username. Messages are immutable once
/// posted, except for deletion by the sender or a project admin.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscussionMessage {
    pub id: DbId,
    pub discussion_id: DbId,
    pub sender_id: DbId,
    pub sender_username: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussion {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDiscussion {
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussionMessage {
    pub content: String,
}
