//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{ConnectionDto, RelayStateDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|(name, member_count)| RoomSummaryDto {
            name: name.into_string(),
            member_count,
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_name).await {
        Ok((name, members)) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                name: name.into_string(),
                member_count: members.len(),
                members: members.iter().map(|id| id.to_string()).collect(),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}

/// Debug endpoint to get current relay state (for testing purposes)
pub async fn debug_relay_state(State(state): State<Arc<AppState>>) -> Json<RelayStateDto> {
    let overview = state.get_relay_state_usecase.execute().await;

    // Domain Model から DTO への変換
    let connections: Vec<ConnectionDto> = overview
        .connections
        .into_iter()
        .map(ConnectionDto::from)
        .collect();
    let rooms: Vec<RoomDetailDto> = overview
        .rooms
        .into_iter()
        .map(|(name, members)| RoomDetailDto {
            name: name.into_string(),
            member_count: members.len(),
            members: members.iter().map(|id| id.to_string()).collect(),
        })
        .collect();

    Json(RelayStateDto {
        connection_count: connections.len(),
        connections,
        rooms,
        buffered_messages: overview.buffered_messages,
    })
}
