//! Repository for rules and rule votes.

use chrono::NaiveDate;
use labelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::rule::{CreateRule, Rule, RuleTallyRow, RuleVote, UpdateRule};

const COLUMNS: &str = "id, project_id, name, description, voting_closed, version, \
     voting_end_date, voting_end_time, created_at, updated_at";

pub struct RuleRepo;

impl RuleRepo {
    /// Insert a rule stamped with the project's current version.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        version: i32,
        input: &CreateRule,
    ) -> Result<Rule, sqlx::Error> {
        let query = format!(
            "INSERT INTO rules (project_id, name, description, version, voting_end_date, voting_end_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rule>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(version)
            .bind(input.voting_end_date)
            .bind(input.voting_end_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rules WHERE id = $1");
        sqlx::query_as::<_, Rule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rules of a project with vote tallies and the requesting user's vote,
    /// one grouped query.
    pub async fn list_with_tallies(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<RuleTallyRow>, sqlx::Error> {
        sqlx::query_as::<_, RuleTallyRow>(
            "SELECT r.id, r.project_id, r.name, r.description, r.voting_closed, r.version,
                    r.voting_end_date, r.voting_end_time, r.created_at, r.updated_at,
                    COUNT(*) FILTER (WHERE v.is_upvote) AS upvotes,
                    COUNT(*) FILTER (WHERE NOT v.is_upvote) AS downvotes,
                    BOOL_OR(v.is_upvote) FILTER (WHERE v.user_id = $2) AS user_is_upvote
             FROM rules r
             LEFT JOIN rule_votes v ON v.rule_id = r.id
             WHERE r.project_id = $1
             GROUP BY r.id
             ORDER BY r.created_at",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRule,
    ) -> Result<Option<Rule>, sqlx::Error> {
        let query = format!(
            "UPDATE rules SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                voting_end_date = COALESCE($4, voting_end_date),
                voting_end_time = COALESCE($5, voting_end_time),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rule>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.voting_end_date)
            .bind(input.voting_end_time)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rules WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_voting_closed(
        pool: &PgPool,
        id: DbId,
        closed: bool,
    ) -> Result<Option<Rule>, sqlx::Error> {
        let query = format!(
            "UPDATE rules SET voting_closed = $2, updated_at = NOW()
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rule>(&query)
            .bind(id)
            .bind(closed)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_vote(
        pool: &PgPool,
        rule_id: DbId,
        user_id: DbId,
    ) -> Result<Option<RuleVote>, sqlx::Error> {
        sqlx::query_as::<_, RuleVote>(
            "SELECT id, rule_id, user_id, is_upvote, created_at
             FROM rule_votes WHERE rule_id = $1 AND user_id = $2",
        )
        .bind(rule_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert_vote(
        pool: &PgPool,
        rule_id: DbId,
        user_id: DbId,
        is_upvote: bool,
    ) -> Result<RuleVote, sqlx::Error> {
        sqlx::query_as::<_, RuleVote>(
            "INSERT INTO rule_votes (rule_id, user_id, is_upvote)
             VALUES ($1, $2, $3)
             RETURNING id, rule_id, user_id, is_upvote, created_at",
        )
        .bind(rule_id)
        .bind(user_id)
        .bind(is_upvote)
        .fetch_one(pool)
        .await
    }

    pub async fn update_vote(
        pool: &PgPool,
        vote_id: DbId,
        is_upvote: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE rule_votes SET is_upvote = $2 WHERE id = $1")
            .bind(vote_id)
            .bind(is_upvote)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete_vote(pool: &PgPool, vote_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM rule_votes WHERE id = $1")
            .bind(vote_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Open rules that carry a voting end date on or before the given day.
    /// The sweep decides per rule whether the deadline has actually passed.
    pub async fn open_rules_ending_by(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<Rule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rules
             WHERE voting_closed = FALSE
               AND voting_end_date IS NOT NULL
               AND voting_end_date <= $1"
        );
        sqlx::query_as::<_, Rule>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    pub async fn close_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE rules SET voting_closed = TRUE, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
