//! Authentication and authorization middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac`] -- Membership checks against the `members` table.

pub mod auth;
pub mod rbac;
