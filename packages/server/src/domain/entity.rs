//! ドメイン層のエンティティ定義
//!
//! リレーが扱うメッセージと接続のモデル。
//! メッセージの `id` / `author` / `content` はクライアントが決める不透明な値で、
//! サーバは内容を検証せずサーバ時刻だけを付与します。

use std::collections::HashSet;

use super::value_object::{ConnectionId, RoomName, Timestamp};

/// タイムスタンプ付与前のメッセージ
///
/// クライアントから受信した直後の状態。フィールドはすべて不透明な文字列として扱う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    /// クライアントが採番したメッセージ ID
    pub id: String,
    /// 送信者の表示名
    pub author: String,
    /// メッセージ本文
    pub content: String,
}

impl MessageDraft {
    /// 新しい MessageDraft を作成
    pub fn new(id: String, author: String, content: String) -> Self {
        Self {
            id,
            author,
            content,
        }
    }
}

/// サーバ時刻が付与されたメッセージ
///
/// バッファに保持され、ブロードキャストと履歴同期の両方で使われる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// クライアントが採番したメッセージ ID
    pub id: String,
    /// 送信者の表示名
    pub author: String,
    /// メッセージ本文
    pub content: String,
    /// サーバが付与した受信時刻
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// MessageDraft にサーバ時刻を付与して ChatMessage を作成
    pub fn new(draft: MessageDraft, timestamp: Timestamp) -> Self {
        Self {
            id: draft.id,
            author: draft.author,
            content: draft.content,
            timestamp,
        }
    }
}

/// 接続中のクライアント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// サーバが採番した接続 ID
    pub id: ConnectionId,
    /// 接続時刻
    pub connected_at: Timestamp,
    /// 参加中のルーム名
    pub rooms: HashSet<RoomName>,
}

impl Connection {
    /// 新しい接続を作成（ルーム未参加の状態）
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            rooms: HashSet::new(),
        }
    }
}
