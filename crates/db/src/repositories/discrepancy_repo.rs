//! Repository for manual discrepancies and their comment threads.

use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::discrepancy::{
    CreateManualDiscrepancy, DiscrepancyComment, DiscrepancyLabelStat, ManualDiscrepancy,
};

const COLUMNS: &str =
    "id, project_id, example_id, reported_by, description, status, created_at, updated_at";

const STAT_COLUMNS: &str = "id, discrepancy_id, label_text, vote_count, percentage";

pub struct DiscrepancyRepo;

impl DiscrepancyRepo {
    /// Insert a manual discrepancy and its label-stat snapshot in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        reported_by: DbId,
        input: &CreateManualDiscrepancy,
    ) -> Result<ManualDiscrepancy, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO manual_discrepancies (project_id, example_id, reported_by, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let discrepancy = sqlx::query_as::<_, ManualDiscrepancy>(&query)
            .bind(project_id)
            .bind(input.example)
            .bind(reported_by)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        for stat in &input.label_stats {
            sqlx::query(
                "INSERT INTO discrepancy_label_stats (discrepancy_id, label_text, vote_count, percentage)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(discrepancy.id)
            .bind(&stat.label_text)
            .bind(stat.vote_count)
            .bind(stat.percentage)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(discrepancy)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ManualDiscrepancy>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manual_discrepancies WHERE id = $1");
        sqlx::query_as::<_, ManualDiscrepancy>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Manual discrepancies of one project, newest first. Reports are
    /// version-scoped; sibling versions keep their own.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ManualDiscrepancy>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manual_discrepancies
             WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ManualDiscrepancy>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Whether this project already has a manual discrepancy on the example.
    pub async fn exists_for_example(
        pool: &PgPool,
        project_id: DbId,
        example_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM manual_discrepancies
                 WHERE project_id = $1 AND example_id = $2
             )",
        )
        .bind(project_id)
        .bind(example_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn label_stats(
        pool: &PgPool,
        discrepancy_id: DbId,
    ) -> Result<Vec<DiscrepancyLabelStat>, sqlx::Error> {
        let query = format!(
            "SELECT {STAT_COLUMNS} FROM discrepancy_label_stats
             WHERE discrepancy_id = $1 ORDER BY vote_count DESC"
        );
        sqlx::query_as::<_, DiscrepancyLabelStat>(&query)
            .bind(discrepancy_id)
            .fetch_all(pool)
            .await
    }

    pub async fn add_comment(
        pool: &PgPool,
        discrepancy_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<DiscrepancyComment, sqlx::Error> {
        sqlx::query_as::<_, DiscrepancyComment>(
            "WITH inserted AS (
                 INSERT INTO discrepancy_comments (discrepancy_id, user_id, content)
                 VALUES ($1, $2, $3)
                 RETURNING id, discrepancy_id, user_id, content, created_at
             )
             SELECT i.id, i.discrepancy_id, i.user_id, u.username, i.content, i.created_at
             FROM inserted i JOIN users u ON u.id = i.user_id",
        )
        .bind(discrepancy_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn list_comments(
        pool: &PgPool,
        discrepancy_id: DbId,
    ) -> Result<Vec<DiscrepancyComment>, sqlx::Error> {
        sqlx::query_as::<_, DiscrepancyComment>(
            "SELECT c.id, c.discrepancy_id, c.user_id, u.username, c.content, c.created_at
             FROM discrepancy_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.discrepancy_id = $1
             ORDER BY c.created_at",
        )
        .bind(discrepancy_id)
        .fetch_all(pool)
        .await
    }
}
