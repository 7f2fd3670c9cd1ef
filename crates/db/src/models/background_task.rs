//! Background task run records.

use labelhub_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One recorded run of a background task. The task-status endpoint surfaces
/// these fields verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BackgroundTask {
    pub id: Uuid,
    pub name: String,
    pub ready: bool,
    pub success: bool,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
