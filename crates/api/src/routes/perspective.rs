//! Route definitions for the global `/perspectives` resource.
//!
//! Project-scoped perspective routes (association, value filling) live under
//! `/projects/{project_id}/perspectives` in [`super::project`].

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::perspective;
use crate::state::AppState;

/// Routes mounted at `/perspectives`.
///
/// ```text
/// GET    /             -> list_mine (groups created by the caller)
/// POST   /             -> create_group (group + items, transactional)
/// GET    /all          -> list_all
/// DELETE /{id}         -> delete_group (creator only, unreferenced only)
/// DELETE /items/{id}   -> delete_item (creator only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(perspective::list_mine).post(perspective::create_group),
        )
        .route("/all", get(perspective::list_all))
        .route("/{id}", delete(perspective::delete_group))
        .route("/items/{id}", delete(perspective::delete_item))
}
