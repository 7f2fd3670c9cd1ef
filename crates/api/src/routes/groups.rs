//! Route definitions for the `/groups` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::groups;
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET  /                  -> list
/// POST /                  -> create (superuser)
/// GET  /{group_id}/users  -> list_members
/// POST /{group_id}/users  -> add_member (superuser)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list).post(groups::create))
        .route(
            "/{group_id}/users",
            get(groups::list_members).post(groups::add_member),
        )
}
