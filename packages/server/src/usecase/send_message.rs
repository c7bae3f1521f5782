//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（サーバ時刻の付与、バッファへの追加、全接続へのブロードキャスト）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：送信者自身を含む全接続にブロードキャストされる
//! - バッファへの追加が失敗した場合、ブロードキャストが行われないことを保証
//! - 一部の接続への送信失敗が他の接続への配信に影響しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：Repository の失敗（送信者にエラー ack が返る）
//! - エッジケース：閉じられた接続が混ざっている場合のブロードキャスト

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageDraft, MessagePusher, RelayRepository};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RelayRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// Repository 経由でサーバ時刻を付与し、バッファに追加します。
    /// ブロードキャストは付与済みメッセージを DTO へ変換してから
    /// `fan_out` で行います（変換は UI 層の責務）。
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - サーバ時刻が付与されたメッセージ
    /// * `Err(SendMessageError)` - バッファへの追加失敗
    pub async fn execute(&self, draft: MessageDraft) -> Result<ChatMessage, SendMessageError> {
        let stored = self
            .repository
            .add_message(draft)
            .await
            .map_err(SendMessageError::Rejected)?;

        Ok(stored)
    }

    /// メッセージを送信者を含む全接続にブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 送信に成功した接続数
    /// * `Err(SendMessageError)` - ブロードキャスト自体の失敗
    pub async fn fan_out(&self, message: &str) -> Result<usize, SendMessageError> {
        self.message_pusher
            .broadcast_all(message)
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))
    }
}
