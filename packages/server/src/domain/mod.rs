//! ドメイン層
//!
//! リレーのドメインモデル（値オブジェクト、エンティティ、集約）と、
//! Infrastructure 層が実装するインターフェース（Repository, MessagePusher）を定義します。
//! この層は他の層に依存しません。

pub mod buffer;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod relay;
pub mod repository;
pub mod value_object;

pub use buffer::{BufferConfig, DEFAULT_MESSAGE_CAPACITY, DEFAULT_RETENTION_MS, MessageBuffer};
pub use entity::{ChatMessage, Connection, MessageDraft};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use pusher::{MessagePusher, PusherChannel};
pub use relay::Relay;
pub use repository::RelayRepository;
pub use value_object::{ConnectionId, RoomName, Timestamp};

#[cfg(test)]
pub use repository::MockRelayRepository;
