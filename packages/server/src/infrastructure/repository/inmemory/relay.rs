//! InMemory Relay Repository 実装
//!
//! ドメイン層が定義する RelayRepository trait の具体的な実装。
//! `Relay` 集約を単一の `Mutex` で包み、すべての状態変更を直列化します。
//! 読み取りも同じロックを通るため、変更途中の状態が観測されることはありません。
//!
//! タイムスタンプの採番もこの層の責務です。`Clock` trait を注入することで、
//! テストでは固定時刻を使えます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kairan_shared::time::Clock;

use crate::domain::{
    ChatMessage, Connection, ConnectionId, MessageDraft, Relay, RelayRepository, RepositoryError,
    RoomName,
};

/// インメモリ Relay Repository 実装
///
/// Relay ドメインモデルを保持し、ドメイン層の RelayRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRelayRepository {
    /// Relay ドメインモデル
    relay: Arc<Mutex<Relay>>,
    /// タイムスタンプの採番に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryRelayRepository {
    /// 新しい InMemoryRelayRepository を作成
    pub fn new(relay: Arc<Mutex<Relay>>, clock: Arc<dyn Clock>) -> Self {
        Self { relay, clock }
    }
}

#[async_trait]
impl RelayRepository for InMemoryRelayRepository {
    async fn register_connection(&self) -> Result<Connection, RepositoryError> {
        let mut relay = self.relay.lock().await;
        Ok(relay.register(self.clock.now_millis()))
    }

    async fn deregister_connection(&self, id: &ConnectionId) -> Result<bool, RepositoryError> {
        let mut relay = self.relay.lock().await;
        Ok(relay.deregister(id))
    }

    async fn connection_count(&self) -> usize {
        let relay = self.relay.lock().await;
        relay.connection_count()
    }

    async fn connections(&self) -> Vec<Connection> {
        let relay = self.relay.lock().await;
        relay.connections()
    }

    async fn join_room(&self, id: &ConnectionId, room: RoomName) -> Result<bool, RepositoryError> {
        let mut relay = self.relay.lock().await;
        Ok(relay.join_room(id, room))
    }

    async fn add_message(&self, draft: MessageDraft) -> Result<ChatMessage, RepositoryError> {
        let mut relay = self.relay.lock().await;
        Ok(relay.insert_message(draft, self.clock.now_millis()))
    }

    async fn recent_messages(&self, window_ms: i64) -> Vec<ChatMessage> {
        let relay = self.relay.lock().await;
        relay.recent_messages(window_ms, self.clock.now_millis())
    }

    async fn message_count(&self) -> usize {
        let relay = self.relay.lock().await;
        relay.message_count()
    }

    async fn room_names(&self) -> Vec<RoomName> {
        let relay = self.relay.lock().await;
        relay.room_names()
    }

    async fn room_members(&self, room: &RoomName) -> Option<Vec<ConnectionId>> {
        let relay = self.relay.lock().await;
        relay.room_members(room)
    }
}
