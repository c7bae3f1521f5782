//! UseCase 層のエラー型定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// バッファへの追加に失敗した
    #[error("Message rejected by the buffer: {0}")]
    Rejected(RepositoryError),
    /// ブロードキャストに失敗した
    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// ルーム名が空文字列
    #[error("Room name must not be empty")]
    EmptyRoomName,
    /// Repository 操作に失敗した
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    /// ルームが存在しない（メンバーのいないルームを含む）
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}
