//! Manual discrepancy models and DTOs.

use labelhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user-reported disagreement on one example within one project version.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ManualDiscrepancy {
    pub id: DbId,
    pub project_id: DbId,
    pub example_id: DbId,
    pub reported_by: Option<DbId>,
    pub description: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Snapshot of one label's vote count at report time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscrepancyLabelStat {
    pub id: DbId,
    pub discrepancy_id: DbId,
    pub label_text: String,
    pub vote_count: i32,
    pub percentage: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscrepancyComment {
    pub id: DbId,
    pub discrepancy_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LabelStatInput {
    pub label_text: String,
    pub vote_count: i32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateManualDiscrepancy {
    pub example: DbId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub label_stats: Vec<LabelStatInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscrepancyComment {
    pub content: String,
}
