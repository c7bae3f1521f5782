//! メッセージバッファ（リングバッファ）
//!
//! 直近のメッセージを容量と保持期間の二つの上限で保持します。
//!
//! ## 不変条件
//!
//! - エントリ数は容量 C を超えない（超過時は古い方から削除）
//! - 挿入時、経過時間が保持期間 R 以上のエントリを削除
//! - タイムスタンプは挿入順に単調非減少（時計の巻き戻りはクランプ）
//!
//! 削除は挿入時にのみ行われます。読み取り（`recent`）は純粋な参照で、
//! 期限切れエントリは年齢フィルタで除外されるため削除を待つ必要はありません。

use std::collections::VecDeque;

use super::entity::{ChatMessage, MessageDraft};
use super::value_object::Timestamp;

/// バッファ容量のデフォルト値
pub const DEFAULT_MESSAGE_CAPACITY: usize = 50;

/// 保持期間のデフォルト値（1 時間）
pub const DEFAULT_RETENTION_MS: i64 = 3_600_000;

/// メッセージバッファの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// 保持する最大メッセージ数
    pub capacity: usize,
    /// メッセージの保持期間（ミリ秒）
    pub retention_ms: i64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_MESSAGE_CAPACITY,
            retention_ms: DEFAULT_RETENTION_MS,
        }
    }
}

/// 直近メッセージのリングバッファ
///
/// エントリは到着順（タイムスタンプ単調非減少）で並びます。
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    entries: VecDeque<ChatMessage>,
    /// 最後に付与したタイムスタンプ（単調性の保証に使用）
    last_timestamp: i64,
    config: BufferConfig,
}

impl MessageBuffer {
    /// 指定した設定でバッファを作成
    pub fn new(config: BufferConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            last_timestamp: 0,
            config,
        }
    }

    /// メッセージにサーバ時刻を付与してバッファに追加
    ///
    /// 時刻の付与、末尾への追加、容量超過分の削除、期限切れエントリの削除を
    /// この順で同期的に行います。付与される時刻は直前のエントリ以上に
    /// クランプされるため、バッファ内の順序は常に時系列です。
    pub fn insert(&mut self, draft: MessageDraft, now: i64) -> ChatMessage {
        let timestamp = now.max(self.last_timestamp);
        self.last_timestamp = timestamp;

        let message = ChatMessage::new(draft, Timestamp::new(timestamp));
        self.entries.push_back(message.clone());

        while self.entries.len() > self.config.capacity {
            self.entries.pop_front();
        }
        while let Some(oldest) = self.entries.front() {
            if now - oldest.timestamp.value() >= self.config.retention_ms {
                self.entries.pop_front();
            } else {
                break;
            }
        }

        message
    }

    /// 経過時間がウィンドウ未満のメッセージを時系列順で取得
    ///
    /// バッファの状態は変更しません。ウィンドウが 0 以下の場合は空を返します。
    pub fn recent(&self, window_ms: i64, now: i64) -> Vec<ChatMessage> {
        if window_ms <= 0 {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|message| now - message.timestamp.value() < window_ms)
            .cloned()
            .collect()
    }

    /// バッファ内のメッセージ数を取得
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// バッファが空かどうかを取得
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// バッファの設定を取得
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new(BufferConfig::default())
    }
}
