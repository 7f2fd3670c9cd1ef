/// Primary key type shared by every entity (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// All timestamps are stored and exchanged in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Version number of a project within its family (starts at 1).
pub type VersionNumber = i32;
