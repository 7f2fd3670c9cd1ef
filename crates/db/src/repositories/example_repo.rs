//! Repository for examples.
//!
//! Examples live on the version-family's original project only, so callers
//! pass the resolved original id, not whatever version the client addressed.

use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::example::{CreateExample, Example, UpdateExample};

const COLUMNS: &str =
    "id, uuid, project_id, text, filename, meta, original_example_id, created_at, updated_at";

pub struct ExampleRepo;

impl ExampleRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateExample,
    ) -> Result<Example, sqlx::Error> {
        let query = format!(
            "INSERT INTO examples (project_id, text, filename, meta)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Example>(&query)
            .bind(project_id)
            .bind(&input.text)
            .bind(&input.filename)
            .bind(&input.meta)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Example>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM examples WHERE id = $1");
        sqlx::query_as::<_, Example>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Example>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM examples WHERE project_id = $1
             ORDER BY created_at LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Example>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM examples WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExample,
    ) -> Result<Option<Example>, sqlx::Error> {
        let query = format!(
            "UPDATE examples SET
                text = COALESCE($2, text),
                filename = COALESCE($3, filename),
                meta = COALESCE($4, meta),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Example>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(&input.filename)
            .bind(&input.meta)
            .fetch_optional(pool)
            .await
    }

    /// Delete the listed examples, or all of the project's examples when
    /// `ids` is empty.
    pub async fn delete_bulk(
        pool: &PgPool,
        project_id: DbId,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = if ids.is_empty() {
            sqlx::query("DELETE FROM examples WHERE project_id = $1")
                .bind(project_id)
                .execute(pool)
                .await?
        } else {
            sqlx::query("DELETE FROM examples WHERE project_id = $1 AND id = ANY($2)")
                .bind(project_id)
                .bind(ids)
                .execute(pool)
                .await?
        };
        Ok(result.rows_affected())
    }
}
