//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::types::DbId;
use labelhub_db::models::user::{CreateUser, User};
use labelhub_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_superuser;
use crate::state::AppState;

/// Minimum password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Username substring filter.
    pub q: Option<String>,
}

/// Result of a delete: the user row may be kept but deactivated when it
/// still belongs to projects.
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub deleted: bool,
    pub deactivated: bool,
}

/// GET /v1/users
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = UserRepo::list(&state.pool, query.q.as_deref()).await?;
    Ok(Json(users))
}

/// GET /v1/users/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    let record = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        })?;
    Ok(Json(record))
}

/// GET /v1/users/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let record = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;
    Ok(Json(record))
}

/// POST /v1/users (superuser only)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_superuser(&user)?;

    if input.username.trim().is_empty() {
        return Err(CoreError::Validation("Username must not be blank".into()).into());
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = UserRepo::create(
        &state.pool,
        &input.username,
        &input.email,
        &password_hash,
        input.is_superuser,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /v1/users/{id} (superuser only)
///
/// A user who belongs to any project is deactivated rather than deleted so
/// annotation history stays attributable. A superuser cannot delete itself.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteUserResponse>> {
    require_superuser(&user)?;

    if id == user.user_id {
        return Err(CoreError::Validation("You cannot delete your own account".into()).into());
    }

    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;

    if UserRepo::has_memberships(&state.pool, id).await? {
        let deactivated = UserRepo::deactivate(&state.pool, id).await?;
        return Ok(Json(DeleteUserResponse {
            deleted: false,
            deactivated,
        }));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    Ok(Json(DeleteUserResponse {
        deleted,
        deactivated: false,
    }))
}
