//! Handlers for category annotations and per-example label stats.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::discrepancy::{label_shares, LabelVotes};
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::label::{Category, CreateCategory};
use labelhub_db::models::project::Project;
use labelhub_db::repositories::{CategoryRepo, CategoryTypeRepo, ExampleRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_member;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnnotationPath {
    pub project_id: DbId,
    pub example_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct AnnotationItemPath {
    pub project_id: DbId,
    pub example_id: DbId,
    pub annotation_id: DbId,
}

/// One label's tally and share for the label-stats endpoint.
#[derive(Debug, Serialize)]
pub struct LabelStat {
    pub label: String,
    pub background_color: String,
    pub count: i64,
    pub percentage: f64,
}

/// GET /v1/projects/{project_id}/examples/{example_id}/annotations
///
/// Annotations on the example filtered by the addressed project's own
/// version stamp.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<AnnotationPath>,
) -> AppResult<Json<Vec<Category>>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let project = find_project(&state, path.project_id).await?;
    ensure_example_owned(&state, &project, path.example_id).await?;

    let annotations =
        CategoryRepo::list_for_example(&state.pool, path.example_id, project.version).await?;
    Ok(Json(annotations))
}

/// POST /v1/projects/{project_id}/examples/{example_id}/annotations
///
/// Stamps the new annotation with the acting project's version.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<AnnotationPath>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    require_member(&state.pool, path.project_id, &user).await?;
    let project = find_project(&state, path.project_id).await?;

    if project.closed {
        return Err(CoreError::Validation("Project is closed".into()).into());
    }
    ensure_example_owned(&state, &project, path.example_id).await?;

    // The label type must belong to this project (each version carries its
    // own copies).
    CategoryTypeRepo::find_by_id(&state.pool, input.category_type_id)
        .await?
        .filter(|t| t.project_id == project.id)
        .ok_or(CoreError::NotFound {
            entity: "label type",
            id: input.category_type_id,
        })?;

    let annotation = CategoryRepo::create(
        &state.pool,
        path.example_id,
        user.user_id,
        project.version,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// DELETE /v1/projects/{project_id}/examples/{example_id}/annotations/{annotation_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<AnnotationItemPath>,
) -> AppResult<StatusCode> {
    require_member(&state.pool, path.project_id, &user).await?;
    let project = find_project(&state, path.project_id).await?;
    ensure_example_owned(&state, &project, path.example_id).await?;

    let removed = CategoryRepo::delete(&state.pool, path.example_id, path.annotation_id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "annotation",
            id: path.annotation_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/projects/{project_id}/examples/{example_id}/label-stats
///
/// Per-label counts and percentage shares under the project's version.
pub async fn label_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<AnnotationPath>,
) -> AppResult<Json<Vec<LabelStat>>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let project = find_project(&state, path.project_id).await?;
    ensure_example_owned(&state, &project, path.example_id).await?;

    let counts =
        CategoryRepo::label_counts_for_example(&state.pool, path.example_id, project.version)
            .await?;

    let votes: Vec<LabelVotes> = counts
        .iter()
        .map(|c| LabelVotes {
            label: c.label_text.clone(),
            count: c.count,
        })
        .collect();
    let shares = label_shares(&votes);

    let stats = counts
        .into_iter()
        .map(|c| LabelStat {
            percentage: shares.get(&c.label_text).copied().unwrap_or(0.0),
            label: c.label_text,
            background_color: c.background_color,
            count: c.count,
        })
        .collect();
    Ok(Json(stats))
}

/// 404 unless the example belongs to the project family's original.
///
/// Examples live on the original project; a member of one project must not
/// reach another family's examples through its own URLs.
async fn ensure_example_owned(
    state: &AppState,
    project: &Project,
    example_id: DbId,
) -> AppResult<()> {
    let original_id = project.original_id();
    ExampleRepo::find_by_id(&state.pool, example_id)
        .await?
        .filter(|e| e.project_id == original_id)
        .ok_or(CoreError::NotFound {
            entity: "example",
            id: example_id,
        })?;
    Ok(())
}
