//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where patches exist, a `Deserialize` update DTO with all-`Option` fields

pub mod background_task;
pub mod discrepancy;
pub mod discussion;
pub mod example;
pub mod group;
pub mod label;
pub mod member;
pub mod perspective;
pub mod project;
pub mod rule;
pub mod session;
pub mod tag;
pub mod user;
