//! Handlers for the `/groups` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::group::{AddGroupMember, CreateGroup, Group, GroupMember};
use labelhub_db::repositories::{GroupRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_superuser;
use crate::state::AppState;

/// GET /v1/groups
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> AppResult<Json<Vec<Group>>> {
    let groups = GroupRepo::list(&state.pool).await?;
    Ok(Json(groups))
}

/// POST /v1/groups (superuser only)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    require_superuser(&user)?;
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Group name must not be blank".into()).into());
    }
    let group = GroupRepo::create(&state.pool, &input.name).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// POST /v1/groups/{group_id}/users (superuser only)
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<DbId>,
    Json(input): Json<AddGroupMember>,
) -> AppResult<StatusCode> {
    require_superuser(&user)?;
    find_group(&state, group_id).await?;
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: input.user_id,
        })?;
    GroupRepo::add_member(&state.pool, group_id, input.user_id).await?;
    Ok(StatusCode::CREATED)
}

/// GET /v1/groups/{group_id}/users
pub async fn list_members(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<Vec<GroupMember>>> {
    find_group(&state, group_id).await?;
    let members = GroupRepo::list_members(&state.pool, group_id).await?;
    Ok(Json(members))
}

async fn find_group(state: &AppState, group_id: DbId) -> AppResult<Group> {
    GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "group",
            id: group_id,
        })
        .map_err(Into::into)
}
