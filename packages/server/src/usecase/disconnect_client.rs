//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 接続の削除（Repository と MessagePusher の両方から取り除く）
//! - ルームメンバーシップの暗黙的なクリーンアップ
//!
//! ### なぜこのテストが必要か
//! - 切断処理が漏れると、存在しない接続への送信が残り続ける
//! - ルームに切断済みの接続が残ると、メンバー一覧が実態と乖離する
//! - 切断の冪等性（同じ接続の二重切断）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続中のクライアントの切断
//! - 異常系：存在しない接続 ID の切断（冪等に無視）
//! - エッジケース：ルームの最後のメンバーが切断した場合のルーム消滅

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, RelayRepository, RepositoryError,
};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn RelayRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クライアント切断を実行
    ///
    /// Repository から接続を削除し（参加中のルームからも取り除かれる）、
    /// MessagePusher から sender を削除します。存在しない接続 ID は
    /// 冪等に無視されます。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 切断後の接続数
    /// * `Err(RepositoryError)` - 切断失敗
    pub async fn execute(&self, id: &ConnectionId) -> Result<usize, RepositoryError> {
        // 1. Repository から接続を削除（ルームメンバーシップも同時に削除）
        let existed = self.repository.deregister_connection(id).await?;
        if !existed {
            tracing::debug!("Connection '{}' already deregistered", id);
        }

        // 2. MessagePusher から sender を削除
        self.message_pusher.unregister_connection(id).await;

        Ok(self.repository.connection_count().await)
    }

    /// 接続数の変化を全クライアントにブロードキャスト
    pub async fn broadcast_user_count(&self, message: &str) -> Result<usize, MessagePushError> {
        self.message_pusher.broadcast_all(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Relay, RoomName},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRelayRepository,
        },
        usecase::connect_client::ConnectClientUseCase,
    };
    use kairan_shared::time::FixedClock;
    use std::{collections::HashMap, sync::Arc};
    use tokio::sync::Mutex;

    fn create_test_repository() -> Arc<InMemoryRelayRepository> {
        let relay = Arc::new(Mutex::new(Relay::default()));
        let clock = Arc::new(FixedClock::new(1000));
        Arc::new(InMemoryRelayRepository::new(relay, clock))
    }

    fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
        let connections = Arc::new(Mutex::new(HashMap::new()));
        Arc::new(WebSocketMessagePusher::new(connections))
    }

    #[tokio::test]
    async fn test_disconnect_removes_connection() {
        // テスト項目: 切断した接続が Repository と MessagePusher の両方から消える
        // given (前提条件): 2 つの接続
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let connect =
            ConnectClientUseCase::new(repository.clone(), message_pusher.clone(), 600_000);
        let usecase = DisconnectClientUseCase::new(repository.clone(), message_pusher.clone());

        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, _rx2) = tokio::sync::mpsc::unbounded_channel();
        let first = connect.execute(tx1).await.unwrap();
        connect.execute(tx2).await.unwrap();

        // when (操作): first を切断
        let result = usecase.execute(&first.id).await;

        // then (期待する結果): 残りの接続数が返される
        assert_eq!(result, Ok(1));
        assert_eq!(repository.connection_count().await, 1);

        // MessagePusher からも削除されている
        let push_result = message_pusher.push_to(&first.id, "hello").await;
        assert!(push_result.is_err());
    }

    #[tokio::test]
    async fn test_disconnect_unknown_connection_is_idempotent() {
        // テスト項目: 存在しない接続 ID の切断はエラーにならない（冪等性）
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = DisconnectClientUseCase::new(repository, create_test_message_pusher());

        // when (操作):
        let unknown = ConnectionId::generate();
        let result = usecase.execute(&unknown).await;

        // then (期待する結果): エラーにならず、接続数 0 が返される
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_disconnect_drops_room_memberships() {
        // テスト項目: 切断により参加中のルームからも取り除かれ、空のルームは消滅する
        // given (前提条件): lobby に参加した接続が 1 つ
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let connect =
            ConnectClientUseCase::new(repository.clone(), message_pusher.clone(), 600_000);
        let usecase = DisconnectClientUseCase::new(repository.clone(), message_pusher);

        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let connection = connect.execute(tx).await.unwrap();
        let lobby = RoomName::new("lobby".to_string()).unwrap();
        repository
            .join_room(&connection.id, lobby.clone())
            .await
            .unwrap();

        // when (操作):
        usecase.execute(&connection.id).await.unwrap();

        // then (期待する結果): ルームは存在しない扱いになる
        assert!(repository.room_members(&lobby).await.is_none());
        assert!(repository.room_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_user_count_after_disconnect() {
        // テスト項目: 切断後の user_count ブロードキャストが残りの接続に届く
        // given (前提条件): 2 つの接続のうち 1 つを切断済み
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let connect =
            ConnectClientUseCase::new(repository.clone(), message_pusher.clone(), 600_000);
        let usecase = DisconnectClientUseCase::new(repository.clone(), message_pusher);

        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        let first = connect.execute(tx1).await.unwrap();
        connect.execute(tx2).await.unwrap();
        let remaining = usecase.execute(&first.id).await.unwrap();

        // when (操作):
        let message = format!(r#"{{"event":"user_count","data":{remaining}}}"#);
        let result = usecase.broadcast_user_count(&message).await;

        // then (期待する結果): 残った接続にのみ届く
        assert_eq!(result, Ok(1));
        assert_eq!(
            rx2.recv().await,
            Some(r#"{"event":"user_count","data":1}"#.to_string())
        );
    }
}
