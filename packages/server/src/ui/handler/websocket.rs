//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageDraft, PusherChannel},
    infrastructure::dto::websocket::{
        AckBody, ClientFrame, EVENT_JOIN_ROOM, EVENT_SEND_MESSAGE, MessageDto, ServerEvent,
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: every event addressed to this
/// client (broadcasts, history sync, acks) is queued on the rx channel and
/// forwarded to the socket here.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the connection. The connection id is assigned by the server,
    // so registration itself cannot be rejected.
    let connection = match state.connect_client_usecase.execute(tx.clone()).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    let connection_id = connection.id.clone();
    tracing::info!("Connection '{}' registered", connection_id);

    // Start the outbound pump before queueing anything for this client
    let mut send_task = pusher_loop(rx, sender);

    // Broadcast the new connection count to every client, including this one
    {
        let count = state.connect_client_usecase.live_count().await;
        let count_json = serde_json::to_string(&ServerEvent::UserCount(count)).unwrap();
        match state
            .connect_client_usecase
            .broadcast_user_count(&count_json)
            .await
        {
            Ok(delivered) => {
                tracing::info!("Broadcasted user count {} to {} connections", count, delivered);
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast user count: {}", e);
            }
        }
    }

    // Push buffered recent messages to the new client only. This is queued
    // before the inbound loop starts, so the history sync always reaches the
    // client ahead of anything triggered by its own frames.
    {
        let snapshot = state.connect_client_usecase.sync_snapshot().await;
        if !snapshot.is_empty() {
            let message_count = snapshot.len();
            let messages: Vec<MessageDto> = snapshot.into_iter().map(Into::into).collect();
            let sync_json = serde_json::to_string(&ServerEvent::SyncMessages(messages)).unwrap();
            match state
                .connect_client_usecase
                .push_sync_snapshot(&connection_id, &sync_json)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        "Pushed {} buffered messages to '{}'",
                        message_count,
                        connection_id
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to push history sync to '{}': {}", connection_id, e);
                }
            }
        }
    }

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text_frame(&state_clone, &connection_id_clone, &tx, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Deregister and broadcast the new count to the remaining clients
    match state.disconnect_client_usecase.execute(&connection_id).await {
        Ok(remaining) => {
            tracing::info!(
                "Connection '{}' disconnected, {} connections remaining",
                connection_id,
                remaining
            );

            let count_json = serde_json::to_string(&ServerEvent::UserCount(remaining)).unwrap();
            if let Err(e) = state
                .disconnect_client_usecase
                .broadcast_user_count(&count_json)
                .await
            {
                tracing::warn!("Failed to broadcast user count: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect '{}': {}", connection_id, e);
        }
    }
}

/// Dispatch one inbound text frame.
///
/// A malformed frame is logged and dropped. A `send_message` frame that carries
/// an ack id always gets exactly one `ack` event back on `ack_tx`, whether the
/// send succeeded or failed.
async fn handle_text_frame(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    ack_tx: &PusherChannel,
    text: &str,
) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Failed to parse frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match frame.event.as_str() {
        EVENT_JOIN_ROOM => {
            let room_name = match serde_json::from_value::<String>(frame.data) {
                Ok(room_name) => room_name,
                Err(e) => {
                    tracing::warn!("Invalid join_room payload from '{}': {}", connection_id, e);
                    return;
                }
            };

            match state
                .join_room_usecase
                .execute(connection_id, room_name.clone())
                .await
            {
                Ok(true) => {
                    tracing::info!("Connection '{}' joined room '{}'", connection_id, room_name);
                }
                Ok(false) => {
                    tracing::debug!(
                        "Connection '{}' already in room '{}' (or unknown), ignoring",
                        connection_id,
                        room_name
                    );
                }
                Err(e) => {
                    tracing::warn!("Rejected join_room from '{}': {}", connection_id, e);
                }
            }
        }
        EVENT_SEND_MESSAGE => {
            let message = match serde_json::from_value::<MessageDto>(frame.data) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(
                        "Invalid send_message payload from '{}': {}",
                        connection_id,
                        e
                    );
                    send_ack(ack_tx, frame.ack, |ack| {
                        AckBody::failed(ack, "invalid message payload".to_string())
                    });
                    return;
                }
            };

            let draft: MessageDraft = message.into();
            let stored = match state.send_message_usecase.execute(draft).await {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!("Failed to store message from '{}': {}", connection_id, e);
                    send_ack(ack_tx, frame.ack, |ack| AckBody::failed(ack, e.to_string()));
                    return;
                }
            };

            let message_id = stored.id.clone();
            let timestamp = stored.timestamp.value();
            let echo_json =
                serde_json::to_string(&ServerEvent::ReceiveMessage(stored.into())).unwrap();
            match state.send_message_usecase.fan_out(&echo_json).await {
                Ok(delivered) => {
                    tracing::debug!(
                        "Broadcasted message '{}' to {} connections",
                        message_id,
                        delivered
                    );
                    send_ack(ack_tx, frame.ack, |ack| {
                        AckBody::ok(ack, message_id.clone(), timestamp)
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to broadcast message '{}': {}", message_id, e);
                    send_ack(ack_tx, frame.ack, |ack| AckBody::failed(ack, e.to_string()));
                }
            }
        }
        other => {
            tracing::warn!("Ignoring unknown event '{}' from '{}'", other, connection_id);
        }
    }
}

/// Queue an `ack` event for the sender, if the inbound frame asked for one.
fn send_ack(ack_tx: &PusherChannel, ack_id: Option<u64>, body: impl FnOnce(u64) -> AckBody) {
    let Some(ack_id) = ack_id else {
        return;
    };
    let ack_json = serde_json::to_string(&ServerEvent::Ack(body(ack_id))).unwrap();
    if ack_tx.send(ack_json).is_err() {
        tracing::warn!("Failed to queue ack {}, connection is gone", ack_id);
    }
}
