//! Handlers for discussion rooms and their message history.
//!
//! Live chat happens over the WebSocket endpoint in `ws::handler`; these
//! handlers cover room CRUD and the HTTP view of the history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::roles::ROLE_PROJECT_ADMIN;
use labelhub_core::types::DbId;
use labelhub_db::models::discussion::{
    CreateDiscussion, CreateDiscussionMessage, Discussion, DiscussionMessage, UpdateDiscussion,
};
use labelhub_db::repositories::{DiscussionRepo, ProjectRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DiscussionPath {
    pub project_id: DbId,
    pub discussion_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct MessagePath {
    pub project_id: DbId,
    pub discussion_id: DbId,
    pub message_id: DbId,
}

/// GET /v1/projects/{project_id}/discussions -- the whole family's rooms.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Discussion>>> {
    require_member(&state.pool, project_id, &user).await?;
    let family = ProjectRepo::version_family_ids(&state.pool, project_id).await?;
    let discussions = DiscussionRepo::list_for_projects(&state.pool, &family).await?;
    Ok(Json(discussions))
}

/// POST /v1/projects/{project_id}/discussions
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDiscussion>,
) -> AppResult<(StatusCode, Json<Discussion>)> {
    require_member(&state.pool, project_id, &user).await?;
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Discussion name must not be blank".into()).into());
    }
    let project = find_project(&state, project_id).await?;
    let discussion = DiscussionRepo::create(
        &state.pool,
        project_id,
        user.user_id,
        project.version,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(discussion)))
}

/// GET /v1/projects/{project_id}/discussions/{discussion_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<DiscussionPath>,
) -> AppResult<Json<Discussion>> {
    require_member(&state.pool, path.project_id, &user).await?;
    let discussion = find_discussion(&state, &path).await?;
    Ok(Json(discussion))
}

/// PATCH /v1/projects/{project_id}/discussions/{discussion_id}
///
/// Creator or a project admin may rename or close the room.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<DiscussionPath>,
    Json(input): Json<UpdateDiscussion>,
) -> AppResult<Json<Discussion>> {
    let member = require_member(&state.pool, path.project_id, &user).await?;
    let discussion = find_discussion(&state, &path).await?;

    if discussion.created_by != user.user_id && member.role != ROLE_PROJECT_ADMIN {
        return Err(
            CoreError::Forbidden("Only the creator or an admin can update a discussion".into())
                .into(),
        );
    }
    if let Some(status) = &input.status {
        if status != "open" && status != "closed" {
            return Err(CoreError::Validation(format!("Unknown status: {status}")).into());
        }
    }

    let updated = DiscussionRepo::update(&state.pool, path.discussion_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "discussion",
            id: path.discussion_id,
        })?;
    Ok(Json(updated))
}

/// DELETE /v1/projects/{project_id}/discussions/{discussion_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<DiscussionPath>,
) -> AppResult<StatusCode> {
    let member = require_member(&state.pool, path.project_id, &user).await?;
    let discussion = find_discussion(&state, &path).await?;

    if discussion.created_by != user.user_id && member.role != ROLE_PROJECT_ADMIN {
        return Err(
            CoreError::Forbidden("Only the creator or an admin can delete a discussion".into())
                .into(),
        );
    }

    DiscussionRepo::delete(&state.pool, path.discussion_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/projects/{project_id}/discussions/{discussion_id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<DiscussionPath>,
) -> AppResult<Json<Vec<DiscussionMessage>>> {
    require_member(&state.pool, path.project_id, &user).await?;
    find_discussion(&state, &path).await?;
    let messages = DiscussionRepo::list_messages(&state.pool, path.discussion_id).await?;
    Ok(Json(messages))
}

/// POST /v1/projects/{project_id}/discussions/{discussion_id}/messages
///
/// HTTP fallback for posting into a room; the WebSocket path is preferred
/// because it also broadcasts.
pub async fn create_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<DiscussionPath>,
    Json(input): Json<CreateDiscussionMessage>,
) -> AppResult<(StatusCode, Json<DiscussionMessage>)> {
    require_member(&state.pool, path.project_id, &user).await?;
    let discussion = find_discussion(&state, &path).await?;
    if discussion.status == "closed" {
        return Err(CoreError::Validation("Discussion is closed".into()).into());
    }
    if input.content.trim().is_empty() {
        return Err(CoreError::Validation("Message must not be empty".into()).into());
    }
    let message = DiscussionRepo::add_message(
        &state.pool,
        path.discussion_id,
        user.user_id,
        &input.content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /v1/projects/{project_id}/discussions/{discussion_id}/messages/{message_id}
///
/// Only the sender or a project admin may delete a message.
pub async fn delete_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<MessagePath>,
) -> AppResult<StatusCode> {
    let member = require_member(&state.pool, path.project_id, &user).await?;
    find_discussion(
        &state,
        &DiscussionPath {
            project_id: path.project_id,
            discussion_id: path.discussion_id,
        },
    )
    .await?;

    let sender =
        DiscussionRepo::message_sender(&state.pool, path.discussion_id, path.message_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "message",
                id: path.message_id,
            })?;

    if sender != user.user_id && member.role != ROLE_PROJECT_ADMIN {
        return Err(
            CoreError::Forbidden("Only the sender or an admin can delete a message".into()).into(),
        );
    }

    DiscussionRepo::delete_message(&state.pool, path.discussion_id, path.message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_discussion(state: &AppState, path: &DiscussionPath) -> AppResult<Discussion> {
    let family = ProjectRepo::version_family_ids(&state.pool, path.project_id).await?;
    DiscussionRepo::find_by_id(&state.pool, path.discussion_id)
        .await?
        .filter(|d| family.contains(&d.project_id))
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "discussion",
                id: path.discussion_id,
            }
            .into()
        })
}
