//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{ChatMessage, Connection, MessageDraft};
use super::error::RepositoryError;
use super::value_object::{ConnectionId, RoomName};

/// Relay Repository trait
///
/// ドメイン層が必要とするデータストアへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// タイムスタンプの採番は実装側の責務です。UseCase 層は時刻を渡さず、
/// 登録やメッセージ追加の結果として付与済みのエンティティを受け取ります。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RelayRepository: Send + Sync {
    /// 新しい接続を登録し、採番された接続を返す
    async fn register_connection(&self) -> Result<Connection, RepositoryError>;

    /// 接続を削除する（冪等）
    ///
    /// 返り値は接続が実際に存在したかどうか
    async fn deregister_connection(&self, id: &ConnectionId) -> Result<bool, RepositoryError>;

    /// 接続中のクライアント数を取得
    async fn connection_count(&self) -> usize;

    /// 接続中の全クライアントを取得
    async fn connections(&self) -> Vec<Connection>;

    /// 接続をルームに参加させる
    ///
    /// 返り値は新規参加なら `true`（参加済み・接続 ID 不明なら `false`）
    async fn join_room(&self, id: &ConnectionId, room: RoomName) -> Result<bool, RepositoryError>;

    /// メッセージにサーバ時刻を付与してバッファに追加
    async fn add_message(&self, draft: MessageDraft) -> Result<ChatMessage, RepositoryError>;

    /// 経過時間がウィンドウ未満のメッセージを時系列順で取得
    async fn recent_messages(&self, window_ms: i64) -> Vec<ChatMessage>;

    /// バッファ内のメッセージ数を取得
    async fn message_count(&self) -> usize;

    /// 存在するルーム名の一覧を取得（名前順）
    async fn room_names(&self) -> Vec<RoomName>;

    /// ルームのメンバー一覧を取得（存在しないルームは `None`）
    async fn room_members(&self, room: &RoomName) -> Option<Vec<ConnectionId>>;
}
