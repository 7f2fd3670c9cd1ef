//! Statistics and report handlers: per-example aggregation, the all-versions
//! view, the annotator report, and the label table.
//!
//! Perspective filters are conjunctive: an annotator is included only when
//! it matches every requested (perspective, value) pair. Filters arrive as
//! comma-separated query values.

use std::collections::{BTreeMap, HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use labelhub_core::discrepancy::{is_discrepant, LabelVotes};
use labelhub_core::error::CoreError;
use labelhub_core::perspective::{members_matching_all, MemberValue};
use labelhub_core::types::DbId;
use labelhub_db::models::label::AnnotationDetail;
use labelhub_db::models::perspective::MemberValueDetail;
use labelhub_db::models::project::Project;
use labelhub_db::repositories::{
    CategoryRepo, DiscrepancyRepo, ExampleRepo, PerspectiveRepo, ProjectRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

/// Label bucket name for votes hidden by a perspective filter.
const OTHERS_BUCKET: &str = "Others";

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    /// Restrict to one example.
    pub example_id: Option<DbId>,
    /// Comma-separated perspective ids; paired positionally with `values`.
    pub perspective_ids: Option<String>,
    /// Comma-separated values for the perspective filter.
    pub values: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AllVersionsQuery {
    /// Comma-separated version numbers; all versions when absent.
    pub versions: Option<String>,
    #[serde(flatten)]
    pub filters: StatisticsQuery,
}

#[derive(Debug, Deserialize)]
pub struct AnnotatorReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub example_id: Option<DbId>,
    pub version: Option<i32>,
    pub username: Option<String>,
    pub perspective_ids: Option<String>,
    pub values: Option<String>,
}

/// One example's aggregated statistics row.
#[derive(Debug, Serialize)]
pub struct StatRow {
    pub example_id: DbId,
    pub example_text: String,
    /// Share per label; includes an `"Others"` bucket when a perspective
    /// filter hides some votes.
    pub label_percentages: BTreeMap<String, f64>,
    pub annotators: Vec<String>,
    pub is_discrepancy: bool,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionStats {
    pub version: i32,
    pub project_id: DbId,
    pub rows: Vec<StatRow>,
}

#[derive(Debug, Serialize)]
pub struct AnnotatorReport {
    pub annotations: Vec<AnnotationDetail>,
    /// Distinct example ids present in the result.
    pub examples: Vec<DbId>,
    /// Distinct versions present in the result.
    pub versions: Vec<i32>,
}

/// One row of the per-example label count matrix.
#[derive(Debug, Serialize)]
pub struct LabelTableRow {
    pub example_id: DbId,
    pub example_text: String,
    pub label_counts: BTreeMap<String, i64>,
    pub is_discrepancy: bool,
    pub status: &'static str,
    /// Distinct perspective values held by this example's annotators,
    /// keyed by perspective id.
    pub perspective_values: BTreeMap<DbId, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct LabelTable {
    /// Every label seen under the project's version.
    pub labels: Vec<String>,
    pub rows: Vec<LabelTableRow>,
    /// Possible perspective values over the family, per perspective id.
    pub perspective_values: BTreeMap<DbId, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AnnotationsByUserRow {
    pub example_id: DbId,
    pub example_text: String,
    pub usernames: Vec<String>,
}

fn parse_id_list(raw: &Option<String>) -> Vec<DbId> {
    raw.as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

fn parse_value_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolve a perspective filter to the set of allowed user ids, or `None`
/// when no filter was requested.
async fn allowed_users_for_filter(
    state: &AppState,
    family: &[DbId],
    perspective_ids: &[DbId],
    values: &[String],
) -> AppResult<Option<HashSet<DbId>>> {
    if perspective_ids.is_empty() || values.is_empty() {
        return Ok(None);
    }
    let rows = PerspectiveRepo::member_values_for_projects(&state.pool, family).await?;
    let core_rows: Vec<MemberValue> = rows
        .iter()
        .map(|r| MemberValue {
            member_id: r.member_id,
            perspective_id: r.perspective_id,
            value: r.value.clone(),
        })
        .collect();
    let matched_members: HashSet<DbId> = members_matching_all(&core_rows, perspective_ids, values)
        .into_iter()
        .collect();
    let users = rows
        .iter()
        .filter(|r| matched_members.contains(&r.member_id))
        .map(|r| r.user_id)
        .collect();
    Ok(Some(users))
}

/// Compute the per-example statistics rows for one project version.
async fn compute_stats(
    state: &AppState,
    project: &Project,
    filters: &StatisticsQuery,
) -> AppResult<Vec<StatRow>> {
    let original_id = project.original_id();
    let family = ProjectRepo::version_family_ids(&state.pool, project.id).await?;

    let perspective_ids = parse_id_list(&filters.perspective_ids);
    let values = parse_value_list(&filters.values);
    let allowed_users =
        allowed_users_for_filter(state, &family, &perspective_ids, &values).await?;

    let reported: HashSet<DbId> = DiscrepancyRepo::list_for_project(&state.pool, project.id)
        .await?
        .into_iter()
        .map(|d| d.example_id)
        .collect();

    let details = CategoryRepo::annotation_details(
        &state.pool,
        original_id,
        Some(project.version),
        None,
        None,
    )
    .await?;

    // Group annotations per example, keeping per-user attribution so the
    // perspective filter can hide individual votes.
    let mut per_example: BTreeMap<DbId, Vec<&AnnotationDetail>> = BTreeMap::new();
    for detail in &details {
        if let Some(example_id) = filters.example_id {
            if detail.example_id != example_id {
                continue;
            }
        }
        per_example.entry(detail.example_id).or_default().push(detail);
    }

    let mut rows = Vec::with_capacity(per_example.len());
    for (example_id, annotations) in per_example {
        let total = annotations.len() as f64;

        // Unfiltered counts drive the discrepancy flag.
        let mut full_counts: HashMap<&str, i64> = HashMap::new();
        for a in &annotations {
            *full_counts.entry(a.label_text.as_str()).or_default() += 1;
        }
        let votes: Vec<LabelVotes> = full_counts
            .iter()
            .map(|(label, count)| LabelVotes {
                label: (*label).to_string(),
                count: *count,
            })
            .collect();
        let flagged = is_discrepant(&votes, project.discrepancy_percentage);

        let mut shown_counts: BTreeMap<String, i64> = BTreeMap::new();
        let mut hidden = 0i64;
        let mut annotators: HashSet<&str> = HashSet::new();
        for a in &annotations {
            let visible = allowed_users
                .as_ref()
                .map_or(true, |users| users.contains(&a.user_id));
            if visible {
                *shown_counts.entry(a.label_text.clone()).or_default() += 1;
                annotators.insert(a.username.as_str());
            } else {
                hidden += 1;
            }
        }

        let mut label_percentages: BTreeMap<String, f64> = shown_counts
            .into_iter()
            .map(|(label, count)| (label, count as f64 * 100.0 / total))
            .collect();
        if hidden > 0 {
            label_percentages.insert(OTHERS_BUCKET.to_string(), hidden as f64 * 100.0 / total);
        }

        let mut annotators: Vec<String> = annotators.into_iter().map(String::from).collect();
        annotators.sort_unstable();

        rows.push(StatRow {
            example_id,
            example_text: annotations
                .first()
                .map(|a| a.example_text.clone())
                .unwrap_or_default(),
            label_percentages,
            annotators,
            is_discrepancy: flagged,
            status: if reported.contains(&example_id) {
                "Reported"
            } else {
                "Not Reported"
            },
        });
    }
    Ok(rows)
}

/// GET /v1/projects/{project_id}/annotation-statistics
pub async fn annotation_statistics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(filters): Query<StatisticsQuery>,
) -> AppResult<Json<Vec<StatRow>>> {
    require_member(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    let rows = compute_stats(&state, &project, &filters).await?;
    Ok(Json(rows))
}

/// GET /v1/projects/{project_id}/all-versions-statistics
///
/// The same aggregation repeated per selected version, sorted by version.
pub async fn all_versions_statistics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<AllVersionsQuery>,
) -> AppResult<Json<Vec<VersionStats>>> {
    require_member(&state.pool, project_id, &user).await?;

    let selected: HashSet<i32> = query
        .versions
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let mut versions = ProjectRepo::versions(&state.pool, project_id).await?;
    versions.sort_by_key(|p| p.version);

    let mut result = Vec::new();
    for version in versions {
        if !selected.is_empty() && !selected.contains(&version.version) {
            continue;
        }
        let rows = compute_stats(&state, &version, &query.filters).await?;
        result.push(VersionStats {
            version: version.version,
            project_id: version.id,
            rows,
        });
    }
    Ok(Json(result))
}

/// GET /v1/projects/{project_id}/reports/annotators (project admin)
pub async fn annotator_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<AnnotatorReportQuery>,
) -> AppResult<Json<AnnotatorReport>> {
    require_project_admin(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    let original_id = project.original_id();
    let family = ProjectRepo::version_family_ids(&state.pool, project_id).await?;

    let perspective_ids = parse_id_list(&query.perspective_ids);
    let values = parse_value_list(&query.values);
    let allowed_users =
        allowed_users_for_filter(&state, &family, &perspective_ids, &values).await?;

    let details = CategoryRepo::annotation_details(
        &state.pool,
        original_id,
        query.version,
        None,
        None,
    )
    .await?;

    let annotations: Vec<AnnotationDetail> = details
        .into_iter()
        .filter(|d| {
            query
                .example_id
                .map_or(true, |example_id| d.example_id == example_id)
        })
        .filter(|d| {
            query
                .username
                .as_deref()
                .map_or(true, |username| d.username == username)
        })
        .filter(|d| {
            query
                .start_date
                .map_or(true, |start| d.created_at.date_naive() >= start)
        })
        .filter(|d| {
            query
                .end_date
                .map_or(true, |end| d.created_at.date_naive() <= end)
        })
        .filter(|d| {
            allowed_users
                .as_ref()
                .map_or(true, |users| users.contains(&d.user_id))
        })
        .collect();

    let examples: Vec<DbId> = {
        let mut ids: Vec<DbId> = annotations
            .iter()
            .map(|a| a.example_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort_unstable();
        ids
    };
    let versions: Vec<i32> = {
        let mut versions: Vec<i32> = annotations
            .iter()
            .map(|a| a.project_version)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        versions.sort_unstable();
        versions
    };

    Ok(Json(AnnotatorReport {
        annotations,
        examples,
        versions,
    }))
}

/// GET /v1/projects/{project_id}/annotation-label-table
pub async fn annotation_label_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<LabelTable>> {
    require_member(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    let original_id = project.original_id();
    let family = ProjectRepo::version_family_ids(&state.pool, project_id).await?;

    let reported: HashSet<DbId> = DiscrepancyRepo::list_for_project(&state.pool, project_id)
        .await?
        .into_iter()
        .map(|d| d.example_id)
        .collect();

    let counts =
        CategoryRepo::label_counts_by_example(&state.pool, original_id, project.version).await?;
    let examples = ExampleRepo::list(&state.pool, original_id, i64::MAX, 0).await?;
    let texts: BTreeMap<DbId, String> = examples.into_iter().map(|e| (e.id, e.text)).collect();

    let annotating =
        CategoryRepo::annotating_users(&state.pool, original_id, project.version).await?;
    let mut annotators_per_example: HashMap<DbId, HashSet<DbId>> = HashMap::new();
    for row in &annotating {
        annotators_per_example
            .entry(row.example_id)
            .or_default()
            .insert(row.user_id);
    }

    let perspective_rows =
        PerspectiveRepo::member_values_for_projects(&state.pool, &family).await?;

    let mut labels: Vec<String> = counts
        .iter()
        .map(|c| c.label_text.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    labels.sort_unstable();

    let mut per_example: BTreeMap<DbId, BTreeMap<String, i64>> = BTreeMap::new();
    for row in counts {
        per_example
            .entry(row.example_id)
            .or_default()
            .insert(row.label_text, row.count);
    }

    let rows = per_example
        .into_iter()
        .map(|(example_id, label_counts)| {
            let votes: Vec<LabelVotes> = label_counts
                .iter()
                .map(|(label, count)| LabelVotes {
                    label: label.clone(),
                    count: *count,
                })
                .collect();
            let annotators = annotators_per_example
                .get(&example_id)
                .cloned()
                .unwrap_or_default();
            LabelTableRow {
                example_id,
                example_text: texts.get(&example_id).cloned().unwrap_or_default(),
                is_discrepancy: is_discrepant(&votes, project.discrepancy_percentage),
                status: if reported.contains(&example_id) {
                    "Reported"
                } else {
                    "Not Reported"
                },
                label_counts,
                perspective_values: annotator_perspective_values(&perspective_rows, &annotators),
            }
        })
        .collect();

    let mut perspective_values: BTreeMap<DbId, Vec<String>> = BTreeMap::new();
    for row in &perspective_rows {
        let entry = perspective_values.entry(row.perspective_id).or_default();
        if !entry.contains(&row.value) {
            entry.push(row.value.clone());
        }
    }

    Ok(Json(LabelTable {
        labels,
        rows,
        perspective_values,
    }))
}

/// Distinct perspective values held by the given users, per perspective id.
fn annotator_perspective_values(
    rows: &[MemberValueDetail],
    users: &HashSet<DbId>,
) -> BTreeMap<DbId, Vec<String>> {
    let mut values: BTreeMap<DbId, Vec<String>> = BTreeMap::new();
    for row in rows {
        if !users.contains(&row.user_id) {
            continue;
        }
        let entry = values.entry(row.perspective_id).or_default();
        if !entry.contains(&row.value) {
            entry.push(row.value.clone());
        }
    }
    for entry in values.values_mut() {
        entry.sort_unstable();
    }
    values
}


/// GET /v1/projects/{project_id}/annotations-by-user
///
/// Example rows crossed with the users who annotated each. 404 when the
/// project has no examples.
pub async fn annotations_by_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<AnnotationsByUserRow>>> {
    require_member(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    let original_id = project.original_id();

    let examples = ExampleRepo::list(&state.pool, original_id, i64::MAX, 0).await?;
    if examples.is_empty() {
        return Err(CoreError::NotFound {
            entity: "example",
            id: project_id,
        }
        .into());
    }

    let annotating =
        CategoryRepo::annotating_users(&state.pool, original_id, project.version).await?;
    let mut per_example: HashMap<DbId, Vec<String>> = HashMap::new();
    for row in annotating {
        per_example.entry(row.example_id).or_default().push(row.username);
    }

    let rows = examples
        .into_iter()
        .map(|example| AnnotationsByUserRow {
            usernames: per_example.remove(&example.id).unwrap_or_default(),
            example_id: example.id,
            example_text: example.text,
        })
        .collect();
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_row(user_id: DbId, perspective_id: DbId, value: &str) -> MemberValueDetail {
        MemberValueDetail {
            member_id: user_id * 10,
            user_id,
            project_id: 1,
            perspective_id,
            value: value.to_string(),
        }
    }

    #[test]
    fn label_table_rows_carry_only_their_annotators_values() {
        let rows = vec![
            value_row(1, 100, "20-30"),
            value_row(1, 200, "pt-BR"),
            value_row(2, 100, "30-40"),
            value_row(3, 100, "20-30"),
        ];
        let annotators: HashSet<DbId> = [1, 3].into_iter().collect();

        let values = annotator_perspective_values(&rows, &annotators);
        assert_eq!(values[&100], vec!["20-30".to_string()]);
        assert_eq!(values[&200], vec!["pt-BR".to_string()]);
        assert!(!values.contains_key(&300));
    }

    #[test]
    fn annotators_values_are_sorted_and_distinct() {
        let rows = vec![
            value_row(1, 100, "b"),
            value_row(2, 100, "a"),
            value_row(3, 100, "b"),
        ];
        let annotators: HashSet<DbId> = [1, 2, 3].into_iter().collect();

        let values = annotator_perspective_values(&rows, &annotators);
        assert_eq!(values[&100], vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn example_without_annotators_has_no_values() {
        let rows = vec![value_row(1, 100, "20-30")];
        let values = annotator_perspective_values(&rows, &HashSet::new());
        assert!(values.is_empty());
    }
}
