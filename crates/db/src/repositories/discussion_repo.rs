//! Repository for discussion rooms and chat messages.

use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::discussion::{
    CreateDiscussion, Discussion, DiscussionMessage, UpdateDiscussion,
};

const COLUMNS: &str =
    "id, project_id, name, created_by, status, project_version, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "d.id, d.discussion_id, d.sender_id, u.username AS sender_username, \
     d.content, d.created_at";

pub struct DiscussionRepo;

impl DiscussionRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        created_by: DbId,
        project_version: i32,
        input: &CreateDiscussion,
    ) -> Result<Discussion, sqlx::Error> {
        let query = format!(
            "INSERT INTO discussions (project_id, name, created_by, project_version)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Discussion>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(created_by)
            .bind(project_version)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Discussion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM discussions WHERE id = $1");
        sqlx::query_as::<_, Discussion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Discussions across a version-family, oldest first.
    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Discussion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM discussions
             WHERE project_id = ANY($1)
             ORDER BY created_at"
        );
        sqlx::query_as::<_, Discussion>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDiscussion,
    ) -> Result<Option<Discussion>, sqlx::Error> {
        let query = format!(
            "UPDATE discussions SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Discussion>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM discussions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Full message history of a room, oldest first.
    pub async fn list_messages(
        pool: &PgPool,
        discussion_id: DbId,
    ) -> Result<Vec<DiscussionMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM discussion_messages d
             JOIN users u ON u.id = d.sender_id
             WHERE d.discussion_id = $1
             ORDER BY d.created_at"
        );
        sqlx::query_as::<_, DiscussionMessage>(&query)
            .bind(discussion_id)
            .fetch_all(pool)
            .await
    }

    pub async fn add_message(
        pool: &PgPool,
        discussion_id: DbId,
        sender_id: DbId,
        content: &str,
    ) -> Result<DiscussionMessage, sqlx::Error> {
        sqlx::query_as::<_, DiscussionMessage>(
            "WITH inserted AS (
                 INSERT INTO discussion_messages (discussion_id, sender_id, content)
                 VALUES ($1, $2, $3)
                 RETURNING id, discussion_id, sender_id, content, created_at
             )
             SELECT i.id, i.discussion_id, i.sender_id, u.username AS sender_username,
                    i.content, i.created_at
             FROM inserted i JOIN users u ON u.id = i.sender_id",
        )
        .bind(discussion_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_message(
        pool: &PgPool,
        discussion_id: DbId,
        message_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "DELETE FROM discussion_messages
             WHERE id = $1 AND discussion_id = $2
             RETURNING sender_id",
        )
        .bind(message_id)
        .bind(discussion_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(sender_id,)| sender_id))
    }

    pub async fn message_sender(
        pool: &PgPool,
        discussion_id: DbId,
        message_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT sender_id FROM discussion_messages WHERE id = $1 AND discussion_id = $2",
        )
        .bind(message_id)
        .bind(discussion_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(sender_id,)| sender_id))
    }
}
