//! UseCase: ルーム一覧取得
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetRoomsUseCase::execute() メソッド
//! - 存在するルームとメンバー数の一覧取得
//!
//! ### なぜこのテストが必要か
//! - HTTP API (`GET /api/rooms`) の応答内容の正しさを保証する
//! - メンバーのいないルームが一覧に現れないことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームの一覧取得
//! - エッジケース：ルームが一つもない場合

use std::sync::Arc;

use crate::domain::{RelayRepository, RoomName};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// ルーム一覧を取得
    ///
    /// # Returns
    ///
    /// ルーム名とメンバー数のペアのリスト（名前順）
    pub async fn execute(&self) -> Vec<(RoomName, usize)> {
        let names = self.repository.room_names().await;
        let mut rooms = Vec::with_capacity(names.len());
        for name in names {
            if let Some(members) = self.repository.room_members(&name).await {
                rooms.push((name, members.len()));
            }
        }
        rooms
    }
}
