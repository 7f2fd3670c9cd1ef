//! Project-scoped authorization checks.
//!
//! Roles live in the `members` table, not in the JWT, so these are async
//! lookups rather than pure extractors. Handlers call the level they need:
//!
//! - [`require_member`] -- any membership in the project.
//! - [`require_project_admin`] -- `project_admin` role in the project.
//! - [`require_superuser`] -- platform superuser claim.

use labelhub_core::error::CoreError;
use labelhub_core::roles::ROLE_PROJECT_ADMIN;
use labelhub_core::types::DbId;
use labelhub_db::models::member::Member;
use labelhub_db::repositories::MemberRepo;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Require that the user is a member of the project. Returns the membership
/// row so callers can inspect the role without a second query.
pub async fn require_member(
    pool: &PgPool,
    project_id: DbId,
    user: &AuthUser,
) -> AppResult<Member> {
    MemberRepo::find_for_user(pool, project_id, user.user_id)
        .await?
        .ok_or_else(|| {
            CoreError::Forbidden("You are not a member of this project".into()).into()
        })
}

/// Require the `project_admin` role in the project.
pub async fn require_project_admin(
    pool: &PgPool,
    project_id: DbId,
    user: &AuthUser,
) -> AppResult<Member> {
    let member = require_member(pool, project_id, user).await?;
    if member.role != ROLE_PROJECT_ADMIN {
        return Err(CoreError::Forbidden("Project admin role required".into()).into());
    }
    Ok(member)
}

/// Require the platform superuser claim.
pub fn require_superuser(user: &AuthUser) -> AppResult<()> {
    if !user.is_superuser() {
        return Err(CoreError::Forbidden("Superuser required".into()).into());
    }
    Ok(())
}
