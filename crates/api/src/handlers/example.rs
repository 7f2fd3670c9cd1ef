//! Handlers for examples.
//!
//! Examples belong to the version-family's original project; every handler
//! resolves the addressed project to its original before touching the store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::example::{CreateExample, Example, UpdateExample};
use labelhub_db::repositories::ExampleRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_member;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListExamplesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ExamplePage {
    pub count: i64,
    pub results: Vec<Example>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteExamples {
    #[serde(default)]
    pub ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ExamplePath {
    pub project_id: DbId,
    pub example_id: DbId,
}

/// GET /v1/projects/{project_id}/examples
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<ListExamplesQuery>,
) -> AppResult<Json<ExamplePage>> {
    require_member(&state.pool, project_id, &user).await?;
    let original_id = find_project(&state, project_id).await?.original_id();

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 1000);
    let offset = query.offset.unwrap_or(0).max(0);

    let count = ExampleRepo::count(&state.pool, original_id).await?;
    let results = ExampleRepo::list(&state.pool, original_id, limit, offset).await?;
    Ok(Json(ExamplePage { count, results }))
}

/// GET /v1/projects/{project_id}/examples/{example_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<ExamplePath>,
) -> AppResult<Json<Example>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let original_id = find_project(&state, path.project_id).await?.original_id();

    let example = ExampleRepo::find_by_id(&state.pool, path.example_id)
        .await?
        .filter(|e| e.project_id == original_id)
        .ok_or(CoreError::NotFound {
            entity: "example",
            id: path.example_id,
        })?;
    Ok(Json(example))
}

/// POST /v1/projects/{project_id}/examples
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateExample>,
) -> AppResult<(StatusCode, Json<Example>)> {
    require_member(&state.pool, project_id, &user).await?;
    let original_id = find_project(&state, project_id).await?.original_id();

    let example = ExampleRepo::create(&state.pool, original_id, &input).await?;
    Ok((StatusCode::CREATED, Json(example)))
}

/// PATCH /v1/projects/{project_id}/examples/{example_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<ExamplePath>,
    Json(input): Json<UpdateExample>,
) -> AppResult<Json<Example>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let original_id = find_project(&state, path.project_id).await?.original_id();

    ExampleRepo::find_by_id(&state.pool, path.example_id)
        .await?
        .filter(|e| e.project_id == original_id)
        .ok_or(CoreError::NotFound {
            entity: "example",
            id: path.example_id,
        })?;

    let example = ExampleRepo::update(&state.pool, path.example_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "example",
            id: path.example_id,
        })?;
    Ok(Json(example))
}

/// DELETE /v1/projects/{project_id}/examples
///
/// Deletes the listed examples; an empty list deletes every example of the
/// family.
pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<BulkDeleteExamples>,
) -> AppResult<StatusCode> {
    require_member(&state.pool, project_id, &user).await?;
    let original_id = find_project(&state, project_id).await?.original_id();

    ExampleRepo::delete_bulk(&state.pool, original_id, &input.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
