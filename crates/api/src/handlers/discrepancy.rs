//! Handlers for automatic discrepancy analysis and manual discrepancies.

use std::collections::{BTreeMap, HashSet};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::discrepancy::{is_discrepant, label_shares, LabelVotes};
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::discrepancy::{
    CreateDiscrepancyComment, CreateManualDiscrepancy, DiscrepancyComment, DiscrepancyLabelStat,
    ManualDiscrepancy,
};
use labelhub_db::repositories::{CategoryRepo, DiscrepancyRepo, ExampleRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_member;
use crate::state::AppState;

/// Minimum total votes in a manual report's label-stat snapshot.
const MIN_SNAPSHOT_VOTES: i32 = 2;

/// One example's analysis row in the discrepancies listing.
#[derive(Debug, Serialize)]
pub struct DiscrepancyRow {
    pub example_id: DbId,
    pub example_text: String,
    pub label_counts: BTreeMap<String, i64>,
    pub label_percentages: BTreeMap<String, f64>,
    pub max_percentage: f64,
    pub is_discrepancy: bool,
    /// "Reported" when a manual discrepancy exists, else "Not Reported".
    pub status: &'static str,
}

/// A manual discrepancy with its snapshot rows.
#[derive(Debug, Serialize)]
pub struct ManualDiscrepancyDetail {
    #[serde(flatten)]
    pub discrepancy: ManualDiscrepancy,
    pub label_stats: Vec<DiscrepancyLabelStat>,
}

/// GET /v1/projects/{project_id}/discrepancies
///
/// Auto-analysis over every annotated example of the family's original,
/// under the addressed project's version.
pub async fn analysis(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<DiscrepancyRow>>> {
    require_member(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    let original_id = project.original_id();

    let reported: HashSet<DbId> = DiscrepancyRepo::list_for_project(&state.pool, project_id)
        .await?
        .into_iter()
        .map(|d| d.example_id)
        .collect();

    let counts =
        CategoryRepo::label_counts_by_example(&state.pool, original_id, project.version).await?;
    let examples = ExampleRepo::list(&state.pool, original_id, i64::MAX, 0).await?;
    let texts: BTreeMap<DbId, String> =
        examples.into_iter().map(|e| (e.id, e.text)).collect();

    // Fold grouped rows into per-example vote lists.
    let mut per_example: BTreeMap<DbId, Vec<LabelVotes>> = BTreeMap::new();
    for row in counts {
        per_example
            .entry(row.example_id)
            .or_default()
            .push(LabelVotes {
                label: row.label_text,
                count: row.count,
            });
    }

    let rows = per_example
        .into_iter()
        .map(|(example_id, votes)| {
            let shares = label_shares(&votes);
            let max_percentage = shares.values().cloned().fold(0.0, f64::max);
            let flagged = is_discrepant(&votes, project.discrepancy_percentage);
            DiscrepancyRow {
                example_id,
                example_text: texts.get(&example_id).cloned().unwrap_or_default(),
                label_counts: votes.into_iter().map(|v| (v.label, v.count)).collect(),
                label_percentages: shares,
                max_percentage,
                is_discrepancy: flagged,
                status: if reported.contains(&example_id) {
                    "Reported"
                } else {
                    "Not Reported"
                },
            }
        })
        .collect();
    Ok(Json(rows))
}

/// GET /v1/projects/{project_id}/manual-discrepancies
pub async fn list_manual(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ManualDiscrepancyDetail>>> {
    require_member(&state.pool, project_id, &user).await?;
    find_project(&state, project_id).await?;

    let discrepancies = DiscrepancyRepo::list_for_project(&state.pool, project_id).await?;
    let mut detailed = Vec::with_capacity(discrepancies.len());
    for discrepancy in discrepancies {
        let label_stats = DiscrepancyRepo::label_stats(&state.pool, discrepancy.id).await?;
        detailed.push(ManualDiscrepancyDetail {
            discrepancy,
            label_stats,
        });
    }
    Ok(Json(detailed))
}

/// POST /v1/projects/{project_id}/manual-discrepancies
///
/// Rejected when this project already carries a report for the example, or
/// when the snapshot's vote counts sum below the minimum. Reports are
/// version-scoped: a sibling version's report does not block this one.
pub async fn create_manual(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateManualDiscrepancy>,
) -> AppResult<(StatusCode, Json<ManualDiscrepancy>)> {
    require_member(&state.pool, project_id, &user).await?;
    find_project(&state, project_id).await?;

    if DiscrepancyRepo::exists_for_example(&state.pool, project_id, input.example).await? {
        return Err(CoreError::Conflict(
            "A discrepancy has already been reported for this example".into(),
        )
        .into());
    }

    let total_votes: i32 = input.label_stats.iter().map(|s| s.vote_count).sum();
    if total_votes < MIN_SNAPSHOT_VOTES {
        return Err(CoreError::Validation(format!(
            "A discrepancy needs at least {MIN_SNAPSHOT_VOTES} votes in its label statistics"
        ))
        .into());
    }

    let created = DiscrepancyRepo::create(&state.pool, project_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, serde::Deserialize)]
pub struct CommentPath {
    pub project_id: DbId,
    pub discrepancy_id: DbId,
}

/// GET /v1/projects/{project_id}/manual-discrepancies/{discrepancy_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<CommentPath>,
) -> AppResult<Json<Vec<DiscrepancyComment>>> {
    require_member(&state.pool, path.project_id, &user).await?;
    find_discrepancy_for_project(&state, path.project_id, path.discrepancy_id).await?;
    let comments = DiscrepancyRepo::list_comments(&state.pool, path.discrepancy_id).await?;
    Ok(Json(comments))
}

/// POST /v1/projects/{project_id}/manual-discrepancies/{discrepancy_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<CommentPath>,
    Json(input): Json<CreateDiscrepancyComment>,
) -> AppResult<(StatusCode, Json<DiscrepancyComment>)> {
    require_member(&state.pool, path.project_id, &user).await?;
    find_discrepancy_for_project(&state, path.project_id, path.discrepancy_id).await?;

    if input.content.trim().is_empty() {
        return Err(CoreError::Validation("Comment must not be empty".into()).into());
    }

    let comment = DiscrepancyRepo::add_comment(
        &state.pool,
        path.discrepancy_id,
        user.user_id,
        &input.content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn find_discrepancy_for_project(
    state: &AppState,
    project_id: DbId,
    discrepancy_id: DbId,
) -> AppResult<ManualDiscrepancy> {
    DiscrepancyRepo::find_by_id(&state.pool, discrepancy_id)
        .await?
        .filter(|d| d.project_id == project_id)
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "discrepancy",
                id: discrepancy_id,
            }
            .into()
        })
}
