//! UseCase 層
//!
//! アプリケーションのユースケースを定義します。
//! 各ユースケースは Repository / MessagePusher の trait にのみ依存し、
//! Infrastructure 層の具体的な実装には依存しません。

pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod get_relay_state;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod send_message;

pub use connect_client::{ConnectClientUseCase, DEFAULT_SYNC_WINDOW_MS};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{GetRoomDetailError, JoinRoomError, SendMessageError};
pub use get_relay_state::{GetRelayStateUseCase, RelayOverview};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use send_message::SendMessageUseCase;
