//! Handlers for project memberships.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::roles::{
    ROLE_ANNOTATION_APPROVER, ROLE_ANNOTATOR, ROLE_PROJECT_ADMIN,
};
use labelhub_core::types::DbId;
use labelhub_db::models::member::{CreateMember, Member, MemberDetail, UpdateMember};
use labelhub_db::repositories::MemberRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

fn validate_role(role: &str) -> AppResult<()> {
    match role {
        ROLE_PROJECT_ADMIN | ROLE_ANNOTATOR | ROLE_ANNOTATION_APPROVER => Ok(()),
        other => Err(CoreError::Validation(format!("Unknown role: {other}")).into()),
    }
}

/// GET /v1/projects/{project_id}/members
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<MemberDetail>>> {
    require_member(&state.pool, project_id, &user).await?;
    let members = MemberRepo::list(&state.pool, project_id).await?;
    Ok(Json(members))
}

/// POST /v1/projects/{project_id}/members (project admin)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    require_project_admin(&state.pool, project_id, &user).await?;
    validate_role(&input.role)?;
    let member = MemberRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[derive(Debug, Deserialize)]
pub struct MemberPath {
    pub project_id: DbId,
    pub member_id: DbId,
}

/// PATCH /v1/projects/{project_id}/members/{member_id} (project admin)
///
/// Demoting the only admin of a project is rejected.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<MemberPath>,
    Json(input): Json<UpdateMember>,
) -> AppResult<Json<Member>> {
    require_project_admin(&state.pool, path.project_id, &user).await?;
    validate_role(&input.role)?;

    let existing = MemberRepo::find_by_id(&state.pool, path.member_id)
        .await?
        .filter(|m| m.project_id == path.project_id)
        .ok_or(CoreError::NotFound {
            entity: "member",
            id: path.member_id,
        })?;

    if existing.role == ROLE_PROJECT_ADMIN
        && input.role != ROLE_PROJECT_ADMIN
        && MemberRepo::admin_count(&state.pool, path.project_id).await? <= 1
    {
        return Err(
            CoreError::Validation("A project must keep at least one admin".into()).into(),
        );
    }

    let member = MemberRepo::update_role(&state.pool, path.member_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "member",
            id: path.member_id,
        })?;
    Ok(Json(member))
}

/// DELETE /v1/projects/{project_id}/members/{member_id} (project admin)
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<MemberPath>,
) -> AppResult<StatusCode> {
    require_project_admin(&state.pool, path.project_id, &user).await?;

    let existing = MemberRepo::find_by_id(&state.pool, path.member_id)
        .await?
        .filter(|m| m.project_id == path.project_id)
        .ok_or(CoreError::NotFound {
            entity: "member",
            id: path.member_id,
        })?;

    if existing.role == ROLE_PROJECT_ADMIN
        && MemberRepo::admin_count(&state.pool, path.project_id).await? <= 1
    {
        return Err(
            CoreError::Validation("A project must keep at least one admin".into()).into(),
        );
    }

    MemberRepo::delete(&state.pool, path.member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
