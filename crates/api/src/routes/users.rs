//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /        -> list (?q= substring filter)
/// POST   /        -> create (superuser)
/// GET    /me      -> me
/// GET    /{id}    -> get
/// DELETE /{id}    -> delete or deactivate (superuser)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/me", get(users::me))
        .route("/{id}", get(users::get).delete(users::delete))
}
