//! WebSocket handler for discussion chat.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use labelhub_core::types::DbId;
use labelhub_db::repositories::{DiscussionRepo, ProjectRepo, UserRepo};
use serde::Deserialize;
use serde_json::json;

use crate::auth::jwt::validate_token;
use crate::state::AppState;
use crate::ws::rooms::RoomKey;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Bearer token passed as a query parameter, browsers cannot set
    /// headers on WebSocket upgrades.
    pub token: Option<String>,
}

/// Inbound chat frame.
#[derive(Debug, Deserialize)]
struct InboundMessage {
    content: Option<String>,
}

/// GET /v1/ws/projects/{project_id}/discussions/{discussion_id}
///
/// Authentication is best-effort: `?token=` first, then the `access_token`
/// cookie, else the connection proceeds anonymously (read-only).
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path((project_id, discussion_id)): Path<(DbId, DbId)>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = query
        .token
        .or_else(|| cookie_value(&headers, "access_token"));

    let user_id = token
        .as_deref()
        .and_then(|t| validate_token(t, &state.config.jwt).ok())
        .map(|claims| claims.sub);

    ws.on_upgrade(move |socket| {
        handle_socket(socket, state, project_id, discussion_id, user_id)
    })
}

/// Manage one chat connection after the upgrade.
///
/// Joins the room, replays the full history oldest-first, then persists and
/// broadcasts inbound messages. Errors are echoed as `{"error": ..}` frames
/// without closing the connection.
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    project_id: DbId,
    discussion_id: DbId,
    user_id: Option<DbId>,
) {
    let key = RoomKey {
        project_id,
        discussion_id,
    };

    // The discussion must exist within the addressed project's family.
    let family = match ProjectRepo::version_family_ids(&state.pool, project_id).await {
        Ok(family) => family,
        Err(e) => {
            tracing::warn!(error = %e, "WebSocket rejected: family lookup failed");
            return;
        }
    };
    let known = DiscussionRepo::find_by_id(&state.pool, discussion_id)
        .await
        .ok()
        .flatten()
        .is_some_and(|d| family.contains(&d.project_id));
    if !known {
        tracing::debug!(project_id, discussion_id, "WebSocket rejected: unknown discussion");
        return;
    }

    let (conn_id, mut rx) = state.rooms.join(key).await;
    tracing::info!(%conn_id, project_id, discussion_id, user_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // Replay history before anything live arrives on this connection.
    match DiscussionRepo::list_messages(&state.pool, discussion_id).await {
        Ok(messages) => {
            for message in messages {
                let frame = json!({ "message": message }).to_string();
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    state.rooms.leave(key, conn_id).await;
                    return;
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to replay discussion history");
        }
    }

    // Sender task: forward room broadcasts to the WebSocket sink.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Receiver loop: persist and broadcast inbound chat frames.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(error) =
                    handle_inbound(&state, key, user_id, text.as_str()).await
                {
                    let frame = json!({ "error": error }).to_string();
                    let _ = state
                        .rooms
                        .broadcast_to_conn(key, conn_id, Message::Text(frame.into()))
                        .await;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    state.rooms.leave(key, conn_id).await;
    send_task.abort();
    tracing::info!(%conn_id, "WebSocket disconnected");
}

/// Process one inbound frame. Returns an error string to echo back, or
/// `None` when the message was persisted and broadcast.
async fn handle_inbound(
    state: &AppState,
    key: RoomKey,
    user_id: Option<DbId>,
    raw: &str,
) -> Option<String> {
    let Some(user_id) = user_id else {
        return Some("Authentication required to send messages".to_string());
    };

    let inbound: InboundMessage = match serde_json::from_str(raw) {
        Ok(inbound) => inbound,
        Err(_) => return Some("Invalid message format".to_string()),
    };
    let content = match inbound.content {
        Some(content) if !content.trim().is_empty() => content,
        _ => return Some("Message content is required".to_string()),
    };

    // Anonymous-looking ids that no longer resolve to a user are treated
    // like missing auth.
    match UserRepo::find_by_id(&state.pool, user_id).await {
        Ok(Some(_)) => {}
        _ => return Some("Authentication required to send messages".to_string()),
    }

    match DiscussionRepo::add_message(&state.pool, key.discussion_id, user_id, &content).await {
        Ok(message) => {
            let frame = json!({ "message": message }).to_string();
            state.rooms.broadcast(key, Message::Text(frame.into())).await;
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to persist chat message");
            Some("Failed to store message".to_string())
        }
    }
}

/// Extract a named cookie from the request headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get("cookie")?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; access_token=abc.def.ghi; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, "access_token").as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_without_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, "access_token"), None);
    }
}
