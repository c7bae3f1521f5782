//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One room in the `GET /api/rooms` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    /// Room name
    pub name: String,
    /// Number of connections currently in the room
    pub member_count: usize,
}

/// `GET /api/rooms/{name}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    /// Room name
    pub name: String,
    /// Number of connections currently in the room
    pub member_count: usize,
    /// Connection ids of the members
    pub members: Vec<String>,
}

/// One connection in the `GET /debug/relay` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDto {
    /// Connection id
    pub id: String,
    /// Connect time (RFC 3339)
    pub connected_at: String,
    /// Rooms the connection has joined
    pub rooms: Vec<String>,
}

/// `GET /debug/relay` response (for testing purposes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayStateDto {
    /// Number of live connections
    pub connection_count: usize,
    /// Live connections, ordered by connect time
    pub connections: Vec<ConnectionDto>,
    /// Existing rooms with their members, ordered by name
    pub rooms: Vec<RoomDetailDto>,
    /// Number of messages currently buffered
    pub buffered_messages: usize,
}
