//! Handler for the background task-status endpoint.

use axum::extract::{Path, State};
use axum::Json;
use labelhub_db::models::background_task::BackgroundTask;
use labelhub_db::repositories::TaskRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /v1/tasks/status/{task_id}
///
/// Surfaces a recorded background task run's ready/result/error fields.
/// Unknown task ids produce a 404.
pub async fn status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<BackgroundTask>> {
    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(task))
}
