//! Handlers for rules and rule voting.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_core::voting::{toggle_vote, vote_percentage, VoteOp};
use labelhub_db::models::rule::{CreateRule, Rule, RuleTallyRow, RuleWithVotes, UpdateRule};
use labelhub_db::repositories::RuleRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RulePath {
    pub project_id: DbId,
    pub rule_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub is_upvote: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateRulesRequest {
    pub items: Vec<CreateRule>,
}

#[derive(Debug, Deserialize)]
pub struct ReopenVoteRequest {
    pub voting_end_date: Option<NaiveDate>,
    pub voting_end_time: Option<NaiveTime>,
}

fn validate_rule_input(input: &CreateRule) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Rule name must not be blank".into()).into());
    }
    if input.description.trim().is_empty() {
        return Err(CoreError::Validation("Rule description must not be blank".into()).into());
    }
    Ok(())
}

fn with_votes(row: RuleTallyRow) -> RuleWithVotes {
    let user_vote = row.user_is_upvote.map(|up| if up { "upvote" } else { "downvote" });
    RuleWithVotes {
        vote_percentage: vote_percentage(row.upvotes, row.downvotes),
        upvotes: row.upvotes,
        downvotes: row.downvotes,
        user_vote,
        rule: Rule {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            description: row.description,
            voting_closed: row.voting_closed,
            version: row.version,
            voting_end_date: row.voting_end_date,
            voting_end_time: row.voting_end_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
    }
}

/// GET /v1/projects/{project_id}/rules
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<RuleWithVotes>>> {
    require_member(&state.pool, project_id, &user).await?;
    let rows = RuleRepo::list_with_tallies(&state.pool, project_id, user.user_id).await?;
    Ok(Json(rows.into_iter().map(with_votes).collect()))
}

/// POST /v1/projects/{project_id}/rules (project admin)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRule>,
) -> AppResult<(StatusCode, Json<Rule>)> {
    require_project_admin(&state.pool, project_id, &user).await?;
    validate_rule_input(&input)?;
    let project = find_project(&state, project_id).await?;
    let rule = RuleRepo::create(&state.pool, project_id, project.version, &input).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// POST /v1/projects/{project_id}/rules/bulk (project admin)
///
/// Creates several rules in one request; every item is validated before any
/// insert happens.
pub async fn create_bulk(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRulesRequest>,
) -> AppResult<(StatusCode, Json<Vec<Rule>>)> {
    require_project_admin(&state.pool, project_id, &user).await?;
    if input.items.is_empty() {
        return Err(CoreError::Validation("No rules given".into()).into());
    }
    for item in &input.items {
        validate_rule_input(item)?;
    }
    let project = find_project(&state, project_id).await?;

    let mut created = Vec::with_capacity(input.items.len());
    for item in &input.items {
        created.push(RuleRepo::create(&state.pool, project_id, project.version, item).await?);
    }
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /v1/projects/{project_id}/rules/{rule_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<RulePath>,
) -> AppResult<Json<Rule>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let rule = find_rule(&state, &path).await?;
    Ok(Json(rule))
}

/// PATCH /v1/projects/{project_id}/rules/{rule_id} (project admin)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<RulePath>,
    Json(input): Json<UpdateRule>,
) -> AppResult<Json<Rule>> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    find_rule(&state, &path).await?;

    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Rule name must not be blank".into()).into());
        }
    }
    if let Some(description) = &input.description {
        if description.trim().is_empty() {
            return Err(
                CoreError::Validation("Rule description must not be blank".into()).into(),
            );
        }
    }

    let rule = RuleRepo::update(&state.pool, path.rule_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "rule",
            id: path.rule_id,
        })?;
    Ok(Json(rule))
}

/// DELETE /v1/projects/{project_id}/rules/{rule_id} (project admin)
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<RulePath>,
) -> AppResult<StatusCode> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    let removed = RuleRepo::delete(&state.pool, path.project_id, path.rule_id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "rule",
            id: path.rule_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/projects/{project_id}/rules/{rule_id}/vote
///
/// Idempotent toggle: voting the same direction removes the vote, the
/// opposite direction flips it, no prior vote creates one. Rejected when
/// voting is closed or the rule belongs to a different version than the
/// project's current one.
pub async fn vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<RulePath>,
    Json(input): Json<VoteRequest>,
) -> AppResult<Json<RuleWithVotes>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let rule = find_rule(&state, &path).await?;
    let project = find_project(&state, path.project_id).await?;

    if rule.voting_closed {
        return Err(CoreError::Validation("Voting is closed for this rule".into()).into());
    }
    if rule.version != project.version {
        return Err(CoreError::Validation(
            "Voting is only allowed on rules of the current project version".into(),
        )
        .into());
    }

    let existing = RuleRepo::find_vote(&state.pool, rule.id, user.user_id).await?;
    match toggle_vote(existing.as_ref().map(|v| v.is_upvote), input.is_upvote) {
        VoteOp::Create => {
            RuleRepo::insert_vote(&state.pool, rule.id, user.user_id, input.is_upvote).await?;
        }
        VoteOp::Flip => {
            // existing is guaranteed present for a flip
            if let Some(vote) = existing {
                RuleRepo::update_vote(&state.pool, vote.id, input.is_upvote).await?;
            }
        }
        VoteOp::Remove => {
            if let Some(vote) = existing {
                RuleRepo::delete_vote(&state.pool, vote.id).await?;
            }
        }
    }

    serialize_rule(&state, path.project_id, rule.id, user.user_id).await
}

/// POST /v1/projects/{project_id}/rules/{rule_id}/close-vote (project admin)
pub async fn close_vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<RulePath>,
) -> AppResult<Json<RuleWithVotes>> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    find_rule(&state, &path).await?;
    RuleRepo::set_voting_closed(&state.pool, path.rule_id, true).await?;
    serialize_rule(&state, path.project_id, path.rule_id, user.user_id).await
}

/// POST /v1/projects/{project_id}/rules/{rule_id}/reopen-vote (project admin)
///
/// Optionally moves the voting deadline while reopening.
pub async fn reopen_vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<RulePath>,
    Json(input): Json<ReopenVoteRequest>,
) -> AppResult<Json<RuleWithVotes>> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    find_rule(&state, &path).await?;

    if input.voting_end_date.is_some() || input.voting_end_time.is_some() {
        RuleRepo::update(
            &state.pool,
            path.rule_id,
            &UpdateRule {
                name: None,
                description: None,
                voting_end_date: input.voting_end_date,
                voting_end_time: input.voting_end_time,
            },
        )
        .await?;
    }
    RuleRepo::set_voting_closed(&state.pool, path.rule_id, false).await?;
    serialize_rule(&state, path.project_id, path.rule_id, user.user_id).await
}

async fn find_rule(state: &AppState, path: &RulePath) -> AppResult<Rule> {
    RuleRepo::find_by_id(&state.pool, path.rule_id)
        .await?
        .filter(|r| r.project_id == path.project_id)
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "rule",
                id: path.rule_id,
            }
            .into()
        })
}

/// Re-read one rule with its tallies for the response body.
async fn serialize_rule(
    state: &AppState,
    project_id: DbId,
    rule_id: DbId,
    user_id: DbId,
) -> AppResult<Json<RuleWithVotes>> {
    let rows = RuleRepo::list_with_tallies(&state.pool, project_id, user_id).await?;
    rows.into_iter()
        .find(|r| r.id == rule_id)
        .map(|row| Json(with_votes(row)))
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "rule",
                id: rule_id,
            }
            .into()
        })
}
