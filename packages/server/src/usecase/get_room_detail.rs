//! UseCase: ルーム詳細取得
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetRoomDetailUseCase::execute() メソッド
//! - 指定したルームのメンバー一覧取得と「存在しない」判定
//!
//! ### なぜこのテストが必要か
//! - メンバーのいないルームは存在しないルームと区別できないという
//!   ドメインの約束を HTTP API の応答（404）として保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーのいるルームの詳細取得
//! - 異常系：存在しないルーム、全員が退出したルーム

use std::sync::Arc;

use crate::domain::{ConnectionId, RelayRepository, RoomName};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// ルーム詳細を取得
    ///
    /// # Returns
    ///
    /// * `Ok((RoomName, Vec<ConnectionId>))` - ルーム名とメンバー一覧（空でない）
    /// * `Err(GetRoomDetailError::RoomNotFound)` - ルームが存在しない
    pub async fn execute(
        &self,
        room_name: String,
    ) -> Result<(RoomName, Vec<ConnectionId>), GetRoomDetailError> {
        let room = RoomName::new(room_name.clone())
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_name.clone()))?;
        match self.repository.room_members(&room).await {
            Some(members) => Ok((room, members)),
            None => Err(GetRoomDetailError::RoomNotFound(room_name)),
        }
    }
}
