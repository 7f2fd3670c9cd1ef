//! HTTP handlers, one module per resource.

pub mod annotation;
pub mod auth;
pub mod discrepancy;
pub mod discussion;
pub mod example;
pub mod groups;
pub mod label_type;
pub mod member;
pub mod perspective;
pub mod project;
pub mod rule;
pub mod statistics;
pub mod tag;
pub mod tasks;
pub mod users;
