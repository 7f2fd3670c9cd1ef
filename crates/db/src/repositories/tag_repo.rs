//! Repository for project tags.

use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag};

const COLUMNS: &str = "id, project_id, text";

pub struct TagRepo;

impl TagRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTag,
    ) -> Result<Tag, sqlx::Error> {
        let query =
            format!("INSERT INTO tags (project_id, text) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(project_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Tag>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
