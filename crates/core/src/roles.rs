//! Well-known project role names.
//!
//! These must match the CHECK constraint on `members.role` in
//! `20260815000002_projects.sql`.

pub const ROLE_PROJECT_ADMIN: &str = "project_admin";
pub const ROLE_ANNOTATOR: &str = "annotator";
pub const ROLE_ANNOTATION_APPROVER: &str = "annotation_approver";
