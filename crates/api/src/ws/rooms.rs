//! Registry of discussion chat rooms.
//!
//! Rooms are keyed by the (project, discussion) pair rather than a
//! string-concatenated group name, so membership is explicit and typed.

use std::collections::HashMap;

use axum::extract::ws::Message;
use labelhub_core::types::DbId;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type RoomSender = mpsc::UnboundedSender<Message>;

/// Identifies one chat room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomKey {
    pub project_id: DbId,
    pub discussion_id: DbId,
}

/// All active chat rooms and their connections.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
#[derive(Default)]
pub struct ChatRooms {
    rooms: RwLock<HashMap<RoomKey, HashMap<Uuid, RoomSender>>>,
}

impl ChatRooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a room, creating it if needed.
    ///
    /// Returns the connection id and the receiver half of the message
    /// channel so the caller can forward messages to the WebSocket sink.
    pub async fn join(&self, key: RoomKey) -> (Uuid, mpsc::UnboundedReceiver<Message>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.rooms
            .write()
            .await
            .entry(key)
            .or_default()
            .insert(conn_id, tx);
        (conn_id, rx)
    }

    /// Leave a room. The room itself is dropped once it is empty.
    pub async fn leave(&self, key: RoomKey, conn_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(room) = rooms.get_mut(&key) {
            room.remove(&conn_id);
            if room.is_empty() {
                rooms.remove(&key);
            }
        }
    }

    /// Broadcast a message to every connection in a room, including the
    /// sender. Connections whose channels are closed are silently skipped.
    ///
    /// Returns the number of connections the message was sent to.
    pub async fn broadcast(&self, key: RoomKey, message: Message) -> usize {
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(&key) else {
            return 0;
        };
        let mut count = 0;
        for sender in room.values() {
            if sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Send a message to a single connection in a room.
    ///
    /// Returns false when the connection is gone.
    pub async fn broadcast_to_conn(&self, key: RoomKey, conn_id: Uuid, message: Message) -> bool {
        let rooms = self.rooms.read().await;
        rooms
            .get(&key)
            .and_then(|room| room.get(&conn_id))
            .is_some_and(|sender| sender.send(message).is_ok())
    }

    /// Number of connections in one room.
    pub async fn room_size(&self, key: RoomKey) -> usize {
        self.rooms
            .read()
            .await
            .get(&key)
            .map_or(0, HashMap::len)
    }

    /// Total connections across all rooms.
    pub async fn connection_count(&self) -> usize {
        self.rooms.read().await.values().map(HashMap::len).sum()
    }

    /// Send a Close frame to every connection and clear the registry.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut rooms = self.rooms.write().await;
        let count: usize = rooms.values().map(HashMap::len).sum();
        for room in rooms.values() {
            for sender in room.values() {
                let _ = sender.send(Message::Close(None));
            }
        }
        rooms.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(project_id: DbId, discussion_id: DbId) -> RoomKey {
        RoomKey {
            project_id,
            discussion_id,
        }
    }

    #[tokio::test]
    async fn join_broadcast_leave() {
        let rooms = ChatRooms::new();
        let room = key(1, 10);

        let (id_a, mut rx_a) = rooms.join(room).await;
        let (_id_b, mut rx_b) = rooms.join(room).await;
        assert_eq!(rooms.room_size(room).await, 2);

        let sent = rooms.broadcast(room, Message::Text("hello".into())).await;
        assert_eq!(sent, 2, "sender is included in the broadcast");
        assert!(matches!(rx_a.recv().await, Some(Message::Text(_))));
        assert!(matches!(rx_b.recv().await, Some(Message::Text(_))));

        rooms.leave(room, id_a).await;
        assert_eq!(rooms.room_size(room).await, 1);
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let rooms = ChatRooms::new();
        let room_a = key(1, 10);
        let room_b = key(1, 11);

        let (_id, mut rx_a) = rooms.join(room_a).await;
        let (_id, mut rx_b) = rooms.join(room_b).await;

        rooms.broadcast(room_a, Message::Text("only a".into())).await;
        assert!(matches!(rx_a.recv().await, Some(Message::Text(_))));
        assert!(
            rx_b.try_recv().is_err(),
            "other rooms must not receive the message"
        );
    }

    #[tokio::test]
    async fn empty_room_is_dropped() {
        let rooms = ChatRooms::new();
        let room = key(2, 20);

        let (conn_id, _rx) = rooms.join(room).await;
        rooms.leave(room, conn_id).await;

        assert_eq!(rooms.room_size(room).await, 0);
        assert_eq!(rooms.connection_count().await, 0);
        assert_eq!(rooms.broadcast(room, Message::Text("x".into())).await, 0);
    }
}
