//! UI 層のリクエストハンドラ

mod http;
mod websocket;

pub use http::{debug_relay_state, get_room_detail, get_rooms, health_check};
pub use websocket::websocket_handler;
