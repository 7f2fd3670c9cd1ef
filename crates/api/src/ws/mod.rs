//! WebSocket chat: the room registry and the connection handler.

pub mod handler;
pub mod rooms;

pub use rooms::{ChatRooms, RoomKey};
