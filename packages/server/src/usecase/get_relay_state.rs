//! UseCase: リレー状態取得（デバッグ用）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetRelayStateUseCase::execute() メソッド
//! - 接続・ルーム・バッファを横断したスナップショットの取得
//!
//! ### なぜこのテストが必要か
//! - デバッグエンドポイント (`GET /debug/relay`) は統合テストの観測点であり、
//!   実際の状態を正しく映していないとテスト自体が信用できなくなる
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続・ルーム・メッセージが混在する状態のスナップショット

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, RelayRepository, RoomName};

/// リレー全体のスナップショット
#[derive(Debug, Clone)]
pub struct RelayOverview {
    /// 接続中のクライアント（接続時刻順）
    pub connections: Vec<Connection>,
    /// ルームとメンバー一覧（名前順）
    pub rooms: Vec<(RoomName, Vec<ConnectionId>)>,
    /// バッファ内のメッセージ数
    pub buffered_messages: usize,
}

/// リレー状態取得のユースケース
pub struct GetRelayStateUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl GetRelayStateUseCase {
    /// 新しい GetRelayStateUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// リレー状態のスナップショットを取得
    pub async fn execute(&self) -> RelayOverview {
        let connections = self.repository.connections().await;
        let names = self.repository.room_names().await;
        let mut rooms = Vec::with_capacity(names.len());
        for name in names {
            if let Some(members) = self.repository.room_members(&name).await {
                rooms.push((name, members));
            }
        }
        let buffered_messages = self.repository.message_count().await;

        RelayOverview {
            connections,
            rooms,
            buffered_messages,
        }
    }
}
