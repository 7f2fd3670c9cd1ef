use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::rooms::ChatRooms;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: labelhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Discussion chat room registry.
    pub rooms: Arc<ChatRooms>,
}
