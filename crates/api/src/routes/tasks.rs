//! Route definitions for the `/tasks` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET /status/{task_id}  -> status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/status/{task_id}", get(tasks::status))
}
