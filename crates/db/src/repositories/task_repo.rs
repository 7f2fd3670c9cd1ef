//! Repository for background task run records.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::background_task::BackgroundTask;

const COLUMNS: &str = "id, name, ready, success, result, error, created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    /// Record a completed task run.
    pub async fn record(
        pool: &PgPool,
        name: &str,
        success: bool,
        result: Option<serde_json::Value>,
        error: Option<&str>,
    ) -> Result<BackgroundTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO background_tasks (id, name, ready, success, result, error)
             VALUES ($1, $2, TRUE, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BackgroundTask>(&query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(success)
            .bind(result)
            .bind(error)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BackgroundTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM background_tasks WHERE id = $1");
        sqlx::query_as::<_, BackgroundTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
