//! ドメイン層の値オブジェクト定義
//!
//! リレーで扱う識別子や時刻を値オブジェクトとして定義します。
//! 不正な値はコンストラクタで弾き、以降の層では常に正しい値として扱えます。

use std::fmt;

use uuid::Uuid;

use super::error::DomainError;

/// 接続 ID
///
/// サーバが接続ごとに採番する一意な識別子。UUID v4 を使用します。
/// クライアントから受け取る値ではないため、バリデーションは不要です。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を採番
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// 内部の UUID への参照を取得
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ルーム名
///
/// クライアントが `join_room` で指定する論理グループの名前。
/// 空文字列のみ拒否し、それ以外の検証は行いません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    /// ルーム名を検証して作成
    ///
    /// # Errors
    ///
    /// 空文字列の場合 `DomainError::EmptyRoomName` を返す
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyRoomName);
        }
        Ok(Self(value))
    }

    /// ルーム名を文字列スライスとして取得
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ルーム名を String として取り出す
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// タイムスタンプ（Unix epoch ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// タイムスタンプを作成
    pub fn new(epoch_millis: i64) -> Self {
        Self(epoch_millis)
    }

    /// epoch ミリ秒の値を取得
    pub fn value(&self) -> i64 {
        self.0
    }
}
