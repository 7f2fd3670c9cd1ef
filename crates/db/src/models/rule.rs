//! Rule and rule-vote models.

use chrono::{NaiveDate, NaiveTime};
use labelhub_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A rule row, stamped with the project version it was created under.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rule {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub voting_closed: bool,
    pub version: VersionNumber,
    pub voting_end_date: Option<NaiveDate>,
    pub voting_end_time: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One user's vote on one rule.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RuleVote {
    pub id: DbId,
    pub rule_id: DbId,
    pub user_id: DbId,
    pub is_upvote: bool,
    pub created_at: Timestamp,
}

/// A rule serialized with its vote tallies and the requesting user's vote.
#[derive(Debug, Clone, Serialize)]
pub struct RuleWithVotes {
    #[serde(flatten)]
    pub rule: Rule,
    pub upvotes: i64,
    pub downvotes: i64,
    pub vote_percentage: f64,
    /// `"upvote"`, `"downvote"` or `None`.
    pub user_vote: Option<&'static str>,
}

/// Raw row for the rule list query: rule fields plus tallies and the
/// requesting user's recorded vote direction.
#[derive(Debug, Clone, FromRow)]
pub struct RuleTallyRow {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub voting_closed: bool,
    pub version: VersionNumber,
    pub voting_end_date: Option<NaiveDate>,
    pub voting_end_time: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub upvotes: i64,
    pub downvotes: i64,
    pub user_is_upvote: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRule {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub voting_end_date: Option<NaiveDate>,
    pub voting_end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRule {
    pub name: Option<String>,
    pub description: Option<String>,
    pub voting_end_date: Option<NaiveDate>,
    pub voting_end_time: Option<NaiveTime>,
}
