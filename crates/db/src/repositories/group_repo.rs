//! Repository for user groups.

use sqlx::PgPool;

use labelhub_core::types::DbId;

use crate::models::group::{Group, GroupMember};

const COLUMNS: &str = "id, name, created_at";

pub struct GroupRepo;

impl GroupRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<Group, sqlx::Error> {
        let query = format!("INSERT INTO groups (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups ORDER BY name");
        sqlx::query_as::<_, Group>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Adding a user who is already a member is a no-op.
    pub async fn add_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_groups (user_id, group_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn list_members(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<GroupMember>, sqlx::Error> {
        sqlx::query_as::<_, GroupMember>(
            "SELECT u.id AS user_id, u.username, u.email
             FROM user_groups ug
             JOIN users u ON u.id = ug.user_id
             WHERE ug.group_id = $1
             ORDER BY u.username",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }
}
