//! Project membership model and DTOs.

use labelhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A membership row: one (user, project, role) triple.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Membership joined with the username, for list endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub role: String,
    pub username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub user_id: DbId,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMember {
    pub role: String,
}
