//! Repository for perspective groups, fields and member values.

use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::perspective::{
    CreatePerspectiveGroup, MemberValueDetail, Perspective,
    PerspectiveMemberValue, PerspectiveProject,
};

const GROUP_COLUMNS: &str = "id, name, created_by, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, perspective_project_id, name, kind, options";
const VALUE_COLUMNS: &str = "id, member_id, perspective_id, value";

pub struct PerspectiveRepo;

impl PerspectiveRepo {
    /// Create a perspective group and its fields in one transaction.
    pub async fn create_group(
        pool: &PgPool,
        created_by: DbId,
        input: &CreatePerspectiveGroup,
    ) -> Result<PerspectiveProject, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO perspective_projects (name, created_by)
             VALUES ($1, $2)
             RETURNING {GROUP_COLUMNS}"
        );
        let group = sqlx::query_as::<_, PerspectiveProject>(&query)
            .bind(&input.name)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.items {
            sqlx::query(
                "INSERT INTO perspectives (perspective_project_id, name, kind, options)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(group.id)
            .bind(&item.name)
            .bind(&item.kind)
            .bind(&item.options)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(group)
    }

    pub async fn find_group(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PerspectiveProject>, sqlx::Error> {
        let query = format!("SELECT {GROUP_COLUMNS} FROM perspective_projects WHERE id = $1");
        sqlx::query_as::<_, PerspectiveProject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_groups(pool: &PgPool) -> Result<Vec<PerspectiveProject>, sqlx::Error> {
        let query = format!("SELECT {GROUP_COLUMNS} FROM perspective_projects ORDER BY created_at DESC");
        sqlx::query_as::<_, PerspectiveProject>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_groups_by_creator(
        pool: &PgPool,
        created_by: DbId,
    ) -> Result<Vec<PerspectiveProject>, sqlx::Error> {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM perspective_projects
             WHERE created_by = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PerspectiveProject>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    pub async fn list_items(
        pool: &PgPool,
        perspective_project_id: DbId,
    ) -> Result<Vec<Perspective>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM perspectives
             WHERE perspective_project_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Perspective>(&query)
            .bind(perspective_project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_item(pool: &PgPool, id: DbId) -> Result<Option<Perspective>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM perspectives WHERE id = $1");
        sqlx::query_as::<_, Perspective>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Ids of the projects currently associated with a group.
    pub async fn referencing_project_ids(
        pool: &PgPool,
        perspective_project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM projects WHERE perspective_project_id = $1 ORDER BY id",
        )
        .bind(perspective_project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Number of projects still associated with a group. Groups in use
    /// cannot be deleted.
    pub async fn group_reference_count(
        pool: &PgPool,
        perspective_project_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE perspective_project_id = $1")
                .bind(perspective_project_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn delete_item(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM perspectives WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_group(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM perspective_projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record or overwrite one member's answer to one field.
    pub async fn upsert_value(
        pool: &PgPool,
        member_id: DbId,
        perspective_id: DbId,
        value: &str,
    ) -> Result<PerspectiveMemberValue, sqlx::Error> {
        let query = format!(
            "INSERT INTO perspective_members (member_id, perspective_id, value)
             VALUES ($1, $2, $3)
             ON CONFLICT (member_id, perspective_id) DO UPDATE SET value = EXCLUDED.value
             RETURNING {VALUE_COLUMNS}"
        );
        sqlx::query_as::<_, PerspectiveMemberValue>(&query)
            .bind(member_id)
            .bind(perspective_id)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    pub async fn values_for_member(
        pool: &PgPool,
        member_id: DbId,
    ) -> Result<Vec<PerspectiveMemberValue>, sqlx::Error> {
        let query = format!(
            "SELECT {VALUE_COLUMNS} FROM perspective_members WHERE member_id = $1 ORDER BY perspective_id"
        );
        sqlx::query_as::<_, PerspectiveMemberValue>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }

    /// Every value recorded by members of the listed projects, joined with
    /// the owning user. Drives family-wide aggregation and conjunctive
    /// member filtering.
    pub async fn member_values_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<MemberValueDetail>, sqlx::Error> {
        sqlx::query_as::<_, MemberValueDetail>(
            "SELECT pm.member_id, m.user_id, m.project_id, pm.perspective_id, pm.value
             FROM perspective_members pm
             JOIN members m ON m.id = pm.member_id
             WHERE m.project_id = ANY($1)
             ORDER BY pm.member_id, pm.perspective_id",
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }

    /// Usernames of members across the listed projects who answered a field
    /// with exactly the given value.
    pub async fn usernames_with_value(
        pool: &PgPool,
        project_ids: &[DbId],
        perspective_id: DbId,
        value: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT u.username
             FROM perspective_members pm
             JOIN members m ON m.id = pm.member_id
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = ANY($1) AND pm.perspective_id = $2 AND pm.value = $3
             ORDER BY u.username",
        )
        .bind(project_ids)
        .bind(perspective_id)
        .bind(value)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
