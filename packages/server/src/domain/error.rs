//! ドメイン層のエラー型定義
//!
//! 各レイヤー（Repository, MessagePusher, ドメインモデル）が返すエラーを
//! thiserror で定義します。UseCase 層はこれらをユースケース固有のエラーに変換します。

use thiserror::Error;

/// ドメインモデルの不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// ルーム名が空文字列
    #[error("Room name must not be empty")]
    EmptyRoomName,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// データストアにアクセスできない
    #[error("Relay state unavailable: {0}")]
    Unavailable(String),
}

/// メッセージ送信（MessagePusher）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先の接続が見つからない
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),
    /// メッセージ送信に失敗
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
