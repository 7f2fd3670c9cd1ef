//! Refresh-token session model.

use labelhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A refresh session row. Only the SHA-256 hash of the opaque refresh token
/// is stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuthSession {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
