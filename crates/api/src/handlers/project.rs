//! Handlers for the `/projects` resource: CRUD, cloning and versioning.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::project_type::ProjectType;
use labelhub_core::roles::ROLE_PROJECT_ADMIN;
use labelhub_core::types::DbId;
use labelhub_db::models::member::CreateMember;
use labelhub_db::models::project::{CreateProject, Project, UpdateProject};
use labelhub_db::repositories::{MemberRepo, ProjectRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct MyRoleResponse {
    pub role: String,
}

/// POST /v1/projects
///
/// Creates the project and adds the creator as its first project admin.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Project name must not be blank".into()).into());
    }
    ProjectType::parse(&input.project_type).ok_or_else(|| {
        CoreError::Validation(format!("Unknown project type: {}", input.project_type))
    })?;

    let project = ProjectRepo::create(&state.pool, &input, user.user_id).await?;

    MemberRepo::create(
        &state.pool,
        project.id,
        &CreateMember {
            user_id: user.user_id,
            role: ROLE_PROJECT_ADMIN.to_string(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /v1/projects -- projects the caller is a member of.
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(projects))
}

/// GET /v1/projects/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    require_member(&state.pool, id, &user).await?;
    let project = find_project(&state, id).await?;
    Ok(Json(project))
}

/// PATCH /v1/projects/{id} (project admin)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    require_project_admin(&state.pool, id, &user).await?;
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Project name must not be blank".into()).into());
        }
    }
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;
    Ok(Json(project))
}

/// DELETE /v1/projects -- bulk delete whole version-families.
pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    if input.ids.is_empty() {
        return Err(CoreError::Validation("No project ids given".into()).into());
    }
    let deleted = ProjectRepo::delete_families(&state.pool, user.user_id, &input.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

/// POST /v1/projects/{id}/clone (project admin)
pub async fn clone_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<Project>)> {
    require_project_admin(&state.pool, id, &user).await?;
    find_project(&state, id).await?;
    let clone = ProjectRepo::clone_project(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(clone)))
}

/// POST /v1/projects/{id}/close (project admin)
///
/// Closes in place; the version history is untouched.
pub async fn close(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    require_project_admin(&state.pool, id, &user).await?;
    let project = ProjectRepo::close(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;
    Ok(Json(project))
}

/// POST /v1/projects/{id}/new-version (project admin)
pub async fn create_new_version(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<Project>)> {
    require_project_admin(&state.pool, id, &user).await?;
    let project = ProjectRepo::create_new_version(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// POST /v1/projects/{id}/reopen (project admin)
///
/// Reopening always moves forward: it is a new version, never a flip of
/// the closed flag.
pub async fn reopen(
    state: State<AppState>,
    user: AuthUser,
    id: Path<DbId>,
) -> AppResult<(StatusCode, Json<Project>)> {
    create_new_version(state, user, id).await
}

/// GET /v1/projects/{id}/versions -- the whole family, ordered by version.
pub async fn versions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Project>>> {
    require_member(&state.pool, id, &user).await?;
    let versions = ProjectRepo::versions(&state.pool, id).await?;
    Ok(Json(versions))
}

/// GET /v1/projects/{id}/my-role
pub async fn my_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MyRoleResponse>> {
    let member = require_member(&state.pool, id, &user).await?;
    Ok(Json(MyRoleResponse { role: member.role }))
}

/// Fetch a project or 404.
pub async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    Ok(ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?)
}
