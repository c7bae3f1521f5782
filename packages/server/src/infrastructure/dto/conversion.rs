//! Conversion logic between DTOs and domain entities.

use kairan_shared::time::millis_to_rfc3339;

use crate::domain::entity;
use crate::infrastructure::dto::http;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::MessageDto> for entity::MessageDraft {
    fn from(dto: dto::MessageDto) -> Self {
        // クライアントが送ってきた timestamp は無視する（サーバが採番する）
        Self {
            id: dto.id,
            author: dto.author,
            content: dto.content,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::ChatMessage> for dto::MessageDto {
    fn from(model: entity::ChatMessage) -> Self {
        Self {
            id: model.id,
            author: model.author,
            content: model.content,
            timestamp: Some(model.timestamp.value()),
        }
    }
}

impl From<entity::Connection> for http::ConnectionDto {
    fn from(model: entity::Connection) -> Self {
        let mut rooms: Vec<String> = model
            .rooms
            .into_iter()
            .map(|room| room.into_string())
            .collect();
        rooms.sort();

        Self {
            id: model.id.to_string(),
            connected_at: millis_to_rfc3339(model.connected_at.value()),
            rooms,
        }
    }
}
