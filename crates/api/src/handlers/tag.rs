//! Handlers for project tags.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::tag::{CreateTag, Tag};
use labelhub_db::repositories::TagRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

/// GET /v1/projects/{project_id}/tags
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Tag>>> {
    require_member(&state.pool, project_id, &user).await?;
    let tags = TagRepo::list(&state.pool, project_id).await?;
    Ok(Json(tags))
}

/// POST /v1/projects/{project_id}/tags (project admin)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    require_project_admin(&state.pool, project_id, &user).await?;
    if input.text.trim().is_empty() {
        return Err(CoreError::Validation("Tag text must not be blank".into()).into());
    }
    let tag = TagRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

#[derive(Debug, Deserialize)]
pub struct TagPath {
    pub project_id: DbId,
    pub tag_id: DbId,
}

/// DELETE /v1/projects/{project_id}/tags/{tag_id} (project admin)
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<TagPath>,
) -> AppResult<StatusCode> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    let removed = TagRepo::delete(&state.pool, path.project_id, path.tag_id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "tag",
            id: path.tag_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
