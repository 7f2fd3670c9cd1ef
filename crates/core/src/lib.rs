//! Domain logic for the annotation platform.
//!
//! Everything in this crate is pure: no I/O, no database handles. The
//! `db` and `api` crates call into these modules for the decisions that
//! matter (discrepancy flagging, vote toggling, perspective matching) so
//! they can be unit tested in isolation.

pub mod discrepancy;
pub mod error;
pub mod perspective;
pub mod project_type;
pub mod roles;
pub mod types;
pub mod voting;
