//! リレーの集約ルート
//!
//! 接続レジストリ、ルームメンバーシップ、メッセージバッファを
//! 一つの集約として保持します。Infrastructure 層はこの集約を
//! `Mutex` で包み、すべての状態変更を直列化します。
//!
//! ## 不変条件
//!
//! - `rooms` のメンバーはすべて `connections` に存在する
//! - `rooms` は空のメンバー集合を持たない（最後のメンバーが抜けた時点でエントリごと削除）

use std::collections::{HashMap, HashSet};

use super::buffer::{BufferConfig, MessageBuffer};
use super::entity::{ChatMessage, Connection, MessageDraft};
use super::value_object::{ConnectionId, RoomName, Timestamp};

/// リレー全体の状態
#[derive(Debug, Clone, Default)]
pub struct Relay {
    /// 接続中のクライアント
    connections: HashMap<ConnectionId, Connection>,
    /// ルーム名とメンバーの対応
    rooms: HashMap<RoomName, HashSet<ConnectionId>>,
    /// 直近メッセージのバッファ
    buffer: MessageBuffer,
}

impl Relay {
    /// 指定したバッファ設定でリレーを作成
    pub fn new(buffer_config: BufferConfig) -> Self {
        Self {
            connections: HashMap::new(),
            rooms: HashMap::new(),
            buffer: MessageBuffer::new(buffer_config),
        }
    }

    /// 新しい接続を登録
    ///
    /// 接続 ID はサーバが採番するため、このメソッドは失敗しません。
    pub fn register(&mut self, now: i64) -> Connection {
        let connection = Connection::new(ConnectionId::generate(), Timestamp::new(now));
        self.connections
            .insert(connection.id.clone(), connection.clone());
        connection
    }

    /// 接続を削除し、参加していたすべてのルームから取り除く
    ///
    /// 存在しない接続 ID に対しては何もしません（冪等）。
    /// 返り値は接続が実際に存在したかどうか。
    pub fn deregister(&mut self, id: &ConnectionId) -> bool {
        let Some(connection) = self.connections.remove(id) else {
            return false;
        };
        for room in &connection.rooms {
            if let Some(members) = self.rooms.get_mut(room) {
                members.remove(id);
                if members.is_empty() {
                    self.rooms.remove(room);
                }
            }
        }
        true
    }

    /// 接続をルームに参加させる
    ///
    /// 返り値は新規参加なら `true`。既に参加済み、または接続 ID が
    /// 存在しない場合は何もせず `false` を返します。
    pub fn join_room(&mut self, id: &ConnectionId, room: RoomName) -> bool {
        let Some(connection) = self.connections.get_mut(id) else {
            return false;
        };
        let newly_joined = connection.rooms.insert(room.clone());
        if newly_joined {
            self.rooms.entry(room).or_default().insert(id.clone());
        }
        newly_joined
    }

    /// 接続数を取得
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// 接続中の全クライアントを取得
    ///
    /// 接続時刻の昇順（同時刻は接続 ID 順）でソートして返します。
    pub fn connections(&self) -> Vec<Connection> {
        let mut connections: Vec<Connection> = self.connections.values().cloned().collect();
        connections.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        connections
    }

    /// 存在するルーム名の一覧を取得（名前順）
    pub fn room_names(&self) -> Vec<RoomName> {
        let mut names: Vec<RoomName> = self.rooms.keys().cloned().collect();
        names.sort();
        names
    }

    /// ルームのメンバー一覧を取得
    ///
    /// ルームが存在しない場合は `None` を返します。メンバーのいない
    /// ルームは存在しないため、`Some` は常に空でないリストです。
    pub fn room_members(&self, room: &RoomName) -> Option<Vec<ConnectionId>> {
        self.rooms.get(room).map(|members| {
            let mut members: Vec<ConnectionId> = members.iter().cloned().collect();
            members.sort();
            members
        })
    }

    /// メッセージにサーバ時刻を付与してバッファに追加
    pub fn insert_message(&mut self, draft: MessageDraft, now: i64) -> ChatMessage {
        self.buffer.insert(draft, now)
    }

    /// 経過時間がウィンドウ未満のメッセージを時系列順で取得
    pub fn recent_messages(&self, window_ms: i64, now: i64) -> Vec<ChatMessage> {
        self.buffer.recent(window_ms, now)
    }

    /// バッファ内のメッセージ数を取得
    pub fn message_count(&self) -> usize {
        self.buffer.len()
    }
}
