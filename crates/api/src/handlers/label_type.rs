//! Handlers for label type definitions (`category_types`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::label::{CategoryType, CreateCategoryType};
use labelhub_db::repositories::CategoryTypeRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LabelTypePath {
    pub project_id: DbId,
    pub label_type_id: DbId,
}

/// GET /v1/projects/{project_id}/label-types
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<CategoryType>>> {
    require_member(&state.pool, project_id, &user).await?;
    let types = CategoryTypeRepo::list(&state.pool, project_id).await?;
    Ok(Json(types))
}

/// POST /v1/projects/{project_id}/label-types
///
/// Members may create label types when the project allows it; admins always
/// can. The route guard only requires membership, the project flag check
/// lives here.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateCategoryType>,
) -> AppResult<(StatusCode, Json<CategoryType>)> {
    let member = require_member(&state.pool, project_id, &user).await?;
    let project = crate::handlers::project::find_project(&state, project_id).await?;

    if member.role != labelhub_core::roles::ROLE_PROJECT_ADMIN
        && !project.allow_member_to_create_label_type
    {
        return Err(
            CoreError::Forbidden("This project does not allow members to create labels".into())
                .into(),
        );
    }

    if input.text.trim().is_empty() {
        return Err(CoreError::Validation("Label text must not be blank".into()).into());
    }

    let created = CategoryTypeRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /v1/projects/{project_id}/label-types/{label_type_id} (project admin)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<LabelTypePath>,
    Json(input): Json<CreateCategoryType>,
) -> AppResult<Json<CategoryType>> {
    require_project_admin(&state.pool, path.project_id, &user).await?;

    CategoryTypeRepo::find_by_id(&state.pool, path.label_type_id)
        .await?
        .filter(|t| t.project_id == path.project_id)
        .ok_or(CoreError::NotFound {
            entity: "label type",
            id: path.label_type_id,
        })?;

    let updated = CategoryTypeRepo::update(&state.pool, path.label_type_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "label type",
            id: path.label_type_id,
        })?;
    Ok(Json(updated))
}

/// DELETE /v1/projects/{project_id}/label-types/{label_type_id} (project admin)
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<LabelTypePath>,
) -> AppResult<StatusCode> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    let removed =
        CategoryTypeRepo::delete(&state.pool, path.project_id, path.label_type_id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "label type",
            id: path.label_type_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
