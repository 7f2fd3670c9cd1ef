pub mod auth;
pub mod groups;
pub mod health;
pub mod perspective;
pub mod project;
pub mod tasks;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws/projects/{project_id}/discussions/{discussion_id}  discussion chat WebSocket
///
/// /health                                          liveness (also served at root)
///
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /users                                           list, create (create: superuser)
/// /users/me                                        caller's profile
/// /users/{id}                                      get, delete/deactivate
///
/// /groups                                          list, create (superuser)
/// /groups/{group_id}/users                         members list, add (superuser)
///
/// /tasks/status/{task_id}                          background task status
///
/// /perspectives                                    caller's groups, create
/// /perspectives/all                                every group
/// /perspectives/{id}                               delete group
/// /perspectives/items/{id}                         delete single perspective
///
/// /projects                                        list, create, bulk delete
/// /projects/{id}                                   get, update
/// /projects/{id}/clone|close|new-version|reopen    lifecycle
/// /projects/{id}/versions, /my-role                family info, caller role
/// /projects/{project_id}/members|tags|examples     project sub-resources
/// /projects/{project_id}/label-types|discussions
/// /projects/{project_id}/rules                     rules + voting
/// /projects/{project_id}/discrepancies             automatic analysis
/// /projects/{project_id}/manual-discrepancies      manual reports + comments
/// /projects/{project_id}/perspectives              association + values
/// /projects/{project_id}/annotation-statistics     statistics & reports
/// /projects/{project_id}/all-versions-statistics
/// /projects/{project_id}/reports/annotators
/// /projects/{project_id}/annotation-label-table
/// /projects/{project_id}/annotations-by-user
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Discussion chat WebSocket.
        .route(
            "/ws/projects/{project_id}/discussions/{discussion_id}",
            get(ws::handler::ws_handler),
        )
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Platform user management.
        .nest("/users", users::router())
        // User groups.
        .nest("/groups", groups::router())
        // Background task status.
        .nest("/tasks", tasks::router())
        // Global perspective group management.
        .nest("/perspectives", perspective::router())
        // Project routes (also nest every project-scoped sub-resource).
        .nest("/projects", project::router())
        // Liveness, mirrored under the versioned prefix.
        .merge(health::router())
}
