//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録（接続 ID の採番、MessagePusher への sender 登録）
//! - 接続数の取得と user_count ブロードキャスト
//! - 履歴同期スナップショットの取得（同期ウィンドウの適用）
//!
//! ### なぜこのテストが必要か
//! - 接続処理はすべてのクライアントセッションの入口であり、
//!   ここで登録された sender が以降のすべての配信経路になる
//! - 同期ウィンドウが正しく適用されないと、新規接続者に古すぎる履歴が届く
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録と接続数の反映
//! - エッジケース：同期ウィンドウ 0（履歴同期なし）

use std::sync::Arc;

use crate::domain::{
    ChatMessage, Connection, ConnectionId, MessagePushError, MessagePusher, PusherChannel,
    RelayRepository, RepositoryError,
};

/// 履歴同期ウィンドウのデフォルト値（10 分）
pub const DEFAULT_SYNC_WINDOW_MS: i64 = 600_000;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 履歴同期ウィンドウ（ミリ秒）
    sync_window_ms: i64,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn RelayRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sync_window_ms: i64,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sync_window_ms,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 接続成功（採番された接続 ID と接続時刻）
    /// * `Err(RepositoryError)` - 接続失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<Connection, RepositoryError> {
        // 1. Repository に接続を登録（接続 ID はサーバが採番）
        let connection = self.repository.register_connection().await?;

        // 2. MessagePusher に sender を登録
        self.message_pusher
            .register_connection(connection.id.clone(), sender)
            .await;

        Ok(connection)
    }

    /// 現在の接続数を取得
    pub async fn live_count(&self) -> usize {
        self.repository.connection_count().await
    }

    /// 新規接続者に送る履歴同期スナップショットを取得
    ///
    /// 同期ウィンドウ内のメッセージを時系列順で返します。
    pub async fn sync_snapshot(&self) -> Vec<ChatMessage> {
        self.repository.recent_messages(self.sync_window_ms).await
    }

    /// 接続数の変化を全クライアントにブロードキャスト
    pub async fn broadcast_user_count(&self, message: &str) -> Result<usize, MessagePushError> {
        self.message_pusher.broadcast_all(message).await
    }

    /// 履歴同期スナップショットを新規接続者にのみ送信
    pub async fn push_sync_snapshot(
        &self,
        id: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageDraft, Relay},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRelayRepository,
        },
    };
    use kairan_shared::time::FixedClock;
    use std::{collections::HashMap, sync::Arc};
    use tokio::sync::Mutex;

    fn create_test_repository(now_millis: i64) -> Arc<InMemoryRelayRepository> {
        let relay = Arc::new(Mutex::new(Relay::default()));
        let clock = Arc::new(FixedClock::new(now_millis));
        Arc::new(InMemoryRelayRepository::new(relay, clock))
    }

    fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
        let connections = Arc::new(Mutex::new(HashMap::new()));
        Arc::new(WebSocketMessagePusher::new(connections))
    }

    #[tokio::test]
    async fn test_connect_registers_connection() {
        // テスト項目: 新規接続が登録され、採番された接続が返される
        // given (前提条件):
        let repository = create_test_repository(1000);
        let message_pusher = create_test_message_pusher();
        let usecase =
            ConnectClientUseCase::new(repository.clone(), message_pusher.clone(), 600_000);

        // when (操作):
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase.execute(tx).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let connection = result.unwrap();
        assert_eq!(connection.connected_at.value(), 1000);
        assert_eq!(repository.connection_count().await, 1);

        // MessagePusher にも登録されている（push_to で届く）
        message_pusher
            .push_to(&connection.id, "hello")
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_live_count_tracks_connections() {
        // テスト項目: 接続のたびに live_count が増える
        // given (前提条件):
        let repository = create_test_repository(1000);
        let usecase =
            ConnectClientUseCase::new(repository.clone(), create_test_message_pusher(), 600_000);

        // when (操作):
        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, _rx2) = tokio::sync::mpsc::unbounded_channel();
        usecase.execute(tx1).await.unwrap();
        usecase.execute(tx2).await.unwrap();

        // then (期待する結果):
        assert_eq!(usecase.live_count().await, 2);
    }

    #[tokio::test]
    async fn test_sync_snapshot_returns_buffered_messages() {
        // テスト項目: 同期ウィンドウ内のメッセージがスナップショットに含まれる
        // given (前提条件): バッファに 2 件のメッセージ
        let repository = create_test_repository(1000);
        let usecase =
            ConnectClientUseCase::new(repository.clone(), create_test_message_pusher(), 600_000);
        repository
            .add_message(MessageDraft::new(
                "msg-1".to_string(),
                "alice".to_string(),
                "Hello!".to_string(),
            ))
            .await
            .unwrap();
        repository
            .add_message(MessageDraft::new(
                "msg-2".to_string(),
                "bob".to_string(),
                "Hi!".to_string(),
            ))
            .await
            .unwrap();

        // when (操作):
        let snapshot = usecase.sync_snapshot().await;

        // then (期待する結果): 時系列順で 2 件
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, "msg-1");
        assert_eq!(snapshot[1].id, "msg-2");
    }

    #[tokio::test]
    async fn test_sync_snapshot_with_zero_window_is_empty() {
        // テスト項目: 同期ウィンドウ 0 ではスナップショットが空になる
        // given (前提条件): バッファにメッセージはあるがウィンドウは 0
        let repository = create_test_repository(1000);
        let usecase =
            ConnectClientUseCase::new(repository.clone(), create_test_message_pusher(), 0);
        repository
            .add_message(MessageDraft::new(
                "msg-1".to_string(),
                "alice".to_string(),
                "Hello!".to_string(),
            ))
            .await
            .unwrap();

        // when (操作):
        let snapshot = usecase.sync_snapshot().await;

        // then (期待する結果):
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_user_count_reaches_all_connections() {
        // テスト項目: user_count ブロードキャストが新規接続者を含む全接続に届く
        // given (前提条件): 2 つの接続
        let repository = create_test_repository(1000);
        let message_pusher = create_test_message_pusher();
        let usecase =
            ConnectClientUseCase::new(repository.clone(), message_pusher.clone(), 600_000);
        let (tx1, mut rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        usecase.execute(tx1).await.unwrap();
        usecase.execute(tx2).await.unwrap();

        // when (操作):
        let result = usecase
            .broadcast_user_count(r#"{"event":"user_count","data":2}"#)
            .await;

        // then (期待する結果): 両方の接続に届く
        assert_eq!(result, Ok(2));
        assert_eq!(
            rx1.recv().await,
            Some(r#"{"event":"user_count","data":2}"#.to_string())
        );
        assert_eq!(
            rx2.recv().await,
            Some(r#"{"event":"user_count","data":2}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_push_sync_snapshot_targets_single_connection() {
        // テスト項目: 履歴同期は指定した接続にのみ届く
        // given (前提条件): 2 つの接続
        let repository = create_test_repository(1000);
        let message_pusher = create_test_message_pusher();
        let usecase =
            ConnectClientUseCase::new(repository.clone(), message_pusher.clone(), 600_000);
        let (tx1, mut rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        let first = usecase.execute(tx1).await.unwrap();
        usecase.execute(tx2).await.unwrap();

        // when (操作): first にだけ履歴を送る
        usecase
            .push_sync_snapshot(&first.id, r#"{"event":"sync_messages","data":[]}"#)
            .await
            .unwrap();

        // then (期待する結果): first には届き、もう一方には何も届かない
        assert_eq!(
            rx1.recv().await,
            Some(r#"{"event":"sync_messages","data":[]}"#.to_string())
        );
        assert!(rx2.try_recv().is_err());
    }
}
