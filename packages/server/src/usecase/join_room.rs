//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルーム名のバリデーション（空文字列の拒否）とメンバーシップへの反映
//!
//! ### なぜこのテストが必要か
//! - ルーム名の検証はここが唯一の入口（Domain Model の生成箇所）
//! - 参加済み・接続 ID 不明のケースが黙って無視されることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - 異常系：空のルーム名
//! - エッジケース：同じルームへの再参加、存在しない接続 ID

use std::sync::Arc;

use crate::domain::{ConnectionId, RelayRepository, RoomName};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 参加する接続の ID
    /// * `room_name` - 参加先のルーム名（未検証の文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 新規参加
    /// * `Ok(false)` - 参加済み、または接続 ID が存在しない（何もしない）
    /// * `Err(JoinRoomError)` - ルーム名が不正
    pub async fn execute(
        &self,
        id: &ConnectionId,
        room_name: String,
    ) -> Result<bool, JoinRoomError> {
        let room = RoomName::new(room_name).map_err(|_| JoinRoomError::EmptyRoomName)?;
        let newly_joined = self.repository.join_room(id, room).await?;
        Ok(newly_joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Relay,
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

    async fn connect(repository: Arc<InMemoryRelayRepository>) -> ConnectionId {
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let connect = ConnectClientUseCase::new(repository, pusher, 600_000);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        connect.execute(tx).await.unwrap().id
    }

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: 接続がルームに参加し、メンバーとして登録される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = JoinRoomUseCase::new(repository.clone());
        let id = connect(repository.clone()).await;

        // when (操作):
        let result = usecase.execute(&id, "lobby".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(true));
        let lobby = RoomName::new("lobby".to_string()).unwrap();
        let members = repository.room_members(&lobby).await.unwrap();
        assert_eq!(members, vec![id]);
    }

    #[tokio::test]
    async fn test_join_room_twice_is_noop() {
        // テスト項目: 参加済みのルームへの再参加は何もしない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = JoinRoomUseCase::new(repository.clone());
        let id = connect(repository.clone()).await;
        usecase.execute(&id, "lobby".to_string()).await.unwrap();

        // when (操作):
        let result = usecase.execute(&id, "lobby".to_string()).await;

        // then (期待する結果): エラーではなく false
        assert_eq!(result, Ok(false));
        let lobby = RoomName::new("lobby".to_string()).unwrap();
        assert_eq!(repository.room_members(&lobby).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_join_room_rejects_empty_name() {
        // テスト項目: 空のルーム名は拒否される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = JoinRoomUseCase::new(repository.clone());
        let id = connect(repository.clone()).await;

        // when (操作):
        let result = usecase.execute(&id, String::new()).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::EmptyRoomName));
        assert!(repository.room_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_room_with_unknown_connection_is_noop() {
        // テスト項目: 存在しない接続 ID のルーム参加は無視され、ルームも作られない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = JoinRoomUseCase::new(repository.clone());

        // when (操作):
        let unknown = ConnectionId::generate();
        let result = usecase.execute(&unknown, "lobby".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
        assert!(repository.room_names().await.is_empty());
    }
}
