//! Repository for project memberships.

use labelhub_core::roles::ROLE_PROJECT_ADMIN;
use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, MemberDetail, UpdateMember};

const COLUMNS: &str = "id, user_id, project_id, role, created_at, updated_at";

const DETAIL_COLUMNS: &str = "m.id, m.user_id, m.project_id, m.role, u.username, \
     m.created_at, m.updated_at";

pub struct MemberRepo;

impl MemberRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (user_id, project_id, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(input.user_id)
            .bind(project_id)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The caller's own membership row in a project, if any.
    pub async fn find_for_user(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE project_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Member>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<MemberDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM members m
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = $1
             ORDER BY m.created_at"
        );
        sqlx::query_as::<_, MemberDetail>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of project admins in a project. Demoting or removing the last
    /// admin must be refused by the caller.
    pub async fn admin_count(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM members WHERE project_id = $1 AND role = $2")
                .bind(project_id)
                .bind(ROLE_PROJECT_ADMIN)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
