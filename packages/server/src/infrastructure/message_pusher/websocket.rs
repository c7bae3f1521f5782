//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中のクライアントと対応する WebSocket sender のマップ
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(id.clone(), sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", id);
    }

    async fn unregister_connection(&self, id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", id);
    }

    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", id);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(id.to_string()))
        }
    }

    async fn broadcast_all(&self, content: &str) -> Result<usize, MessagePushError> {
        let connections = self.connections.lock().await;

        let mut delivered = 0;
        for (id, sender) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!("Failed to push message to connection '{}': {}", id, e);
            } else {
                delivered += 1;
            }
        }

        tracing::debug!(
            "Broadcasted message to {}/{} connections",
            delivered,
            connections.len()
        );
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の基本的なメッセージ送信機能
    // - push_to: 特定の接続への送信
    // - broadcast_all: 全接続への送信
    // - エラーハンドリング（存在しない接続、閉じられたチャネル）
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher は UseCase から呼ばれる通信層の中核
    // - ブロードキャストの部分失敗が他の接続に波及しないことを保証する
    // - WebSocket sender が正しく使われることを検証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース
    // 2. push_to の失敗ケース（接続が存在しない）
    // 3. broadcast_all の成功ケース（複数接続）
    // 4. broadcast_all の部分失敗ケース（閉じられたチャネルが混在）
    // 5. 接続が一つもない場合のブロードキャスト
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let connections = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(connections.clone());
        (pusher, connections)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        pusher.register_connection(id.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let unknown = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(&unknown, "Hello").await;

        // then (期待する結果):
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ConnectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: 受信側が閉じられたチャネルへの送信は PushFailed を返す
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(rx);
        let id = ConnectionId::generate();
        pusher.register_connection(id.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::PushFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_connection() {
        // テスト項目: 登録中のすべての接続にメッセージが届く
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(ConnectionId::generate(), tx1).await;
        pusher.register_connection(ConnectionId::generate(), tx2).await;

        // when (操作):
        let result = pusher.broadcast_all("Broadcast message").await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_partial_failure() {
        // テスト項目: 閉じられたチャネルが混ざっていてもブロードキャストは続行される
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel::<String>();
        drop(rx2);
        pusher.register_connection(ConnectionId::generate(), tx1).await;
        pusher.register_connection(ConnectionId::generate(), tx2).await;

        // when (操作):
        let result = pusher.broadcast_all("Broadcast message").await;

        // then (期待する結果): 部分失敗を許容し、成功数だけが数えられる
        assert_eq!(result, Ok(1));
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_with_no_connections() {
        // テスト項目: 接続が一つもなくてもエラーにならない
        // given (前提条件):
        let (pusher, _connections) = create_test_pusher();

        // when (操作):
        let result = pusher.broadcast_all("Message").await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }
}
