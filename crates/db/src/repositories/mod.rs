//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step operations
//! (project clone, new version, discrepancy report) run inside a single
//! transaction.

pub mod discrepancy_repo;
pub mod discussion_repo;
pub mod example_repo;
pub mod group_repo;
pub mod label_repo;
pub mod member_repo;
pub mod perspective_repo;
pub mod project_repo;
pub mod rule_repo;
pub mod session_repo;
pub mod tag_repo;
pub mod task_repo;
pub mod user_repo;

pub use discrepancy_repo::DiscrepancyRepo;
pub use discussion_repo::DiscussionRepo;
pub use example_repo::ExampleRepo;
pub use group_repo::GroupRepo;
pub use label_repo::{CategoryRepo, CategoryTypeRepo};
pub use member_repo::MemberRepo;
pub use perspective_repo::PerspectiveRepo;
pub use project_repo::ProjectRepo;
pub use rule_repo::RuleRepo;
pub use session_repo::SessionRepo;
pub use tag_repo::TagRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
