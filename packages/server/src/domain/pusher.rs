//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ送信（通知）のインターフェースを定義します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ConnectionId;

/// クライアントへの送信チャネル
///
/// UI 層が WebSocket 接続ごとに作成する `UnboundedSender`。
/// シリアライズ済みの JSON 文字列を流します。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait を通じてクライアントへメッセージを届けます。
/// 送信先の管理（チャネルの登録・削除）も実装側の責務です。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャネルを登録
    async fn register_connection(&self, id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャネルを削除
    async fn unregister_connection(&self, id: &ConnectionId);

    /// 特定の接続にメッセージを送信
    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), MessagePushError>;

    /// 登録中のすべての接続にメッセージを送信
    ///
    /// 個々の接続への送信失敗はスキップして続行し、送信に成功した件数を返す
    async fn broadcast_all(&self, content: &str) -> Result<usize, MessagePushError>;
}
