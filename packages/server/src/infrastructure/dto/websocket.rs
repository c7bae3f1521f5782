//! WebSocket message DTOs.
//!
//! The wire protocol is a JSON envelope per WebSocket text frame:
//!
//! - Inbound (client to server): `{"event": <name>, "data": <payload>, "ack": <id>}`
//!   where `ack` is an optional correlation id. When present, the server answers
//!   the frame with an `ack` event carrying the same id.
//! - Outbound (server to client): `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound event name: join a room.
pub const EVENT_JOIN_ROOM: &str = "join_room";

/// Inbound event name: broadcast a chat message.
pub const EVENT_SEND_MESSAGE: &str = "send_message";

/// Generic inbound frame.
///
/// `data` is kept as raw JSON and decoded per event, so an unknown event
/// or a malformed payload never breaks frame parsing itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientFrame {
    /// Event name (`join_room`, `send_message`, ...)
    pub event: String,
    /// Event payload (shape depends on the event)
    #[serde(default)]
    pub data: Value,
    /// Ack correlation id. `None` means the client does not expect an ack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
}

impl ClientFrame {
    /// Build a `join_room` frame.
    pub fn join_room(room: &str) -> Self {
        Self {
            event: EVENT_JOIN_ROOM.to_string(),
            data: Value::String(room.to_string()),
            ack: None,
        }
    }

    /// Build a `send_message` frame with an ack correlation id.
    pub fn send_message(message: &MessageDto, ack: u64) -> Self {
        Self {
            event: EVENT_SEND_MESSAGE.to_string(),
            data: serde_json::json!(message),
            ack: Some(ack),
        }
    }
}

/// Chat message record as it appears on the wire.
///
/// `id`, `author` and `content` are opaque client-provided strings.
/// `timestamp` is assigned by the server; a client-sent value is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    /// Client-assigned message id
    pub id: String,
    /// Display name of the sender
    pub author: String,
    /// Message body
    pub content: String,
    /// Server-assigned receive time (Unix epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Payload of an outbound `ack` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckBody {
    /// Correlation id echoed from the inbound frame
    pub ack: u64,
    /// Whether the send was accepted
    pub success: bool,
    /// Id of the accepted message (present on success)
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Server-assigned receive time (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Failure description (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckBody {
    /// Build a success ack.
    pub fn ok(ack: u64, message_id: String, timestamp: i64) -> Self {
        Self {
            ack,
            success: true,
            message_id: Some(message_id),
            timestamp: Some(timestamp),
            error: None,
        }
    }

    /// Build a failure ack.
    pub fn failed(ack: u64, error: String) -> Self {
        Self {
            ack,
            success: false,
            message_id: None,
            timestamp: None,
            error: Some(error),
        }
    }
}

/// Outbound server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Total connection count, broadcast on every connect and disconnect
    UserCount(usize),
    /// A chat message, broadcast to every connection including the sender
    ReceiveMessage(MessageDto),
    /// Buffered recent messages, pushed once to a newly connected client
    SyncMessages(Vec<MessageDto>),
    /// Result of a `send_message` frame that carried an ack id
    Ack(AckBody),
}
