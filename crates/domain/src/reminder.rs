//! # リマインダー
//!
//! 通知の対象となるリマインダーの識別子と予定時刻を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`ReminderId`] | リマインダー ID | `test-` で始まる値はテスト送信を表す |
//! | [`ScheduledTime`] | 予定時刻 | 表示専用。送信タイミングには使わない |

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// テスト送信を表す ID プレフィックス
///
/// このプレフィックスを持つ ID の送信では永続化された状態を一切変更しない。
pub const TEST_MARKER_PREFIX: &str = "test-";

/// 表示用の日時フォーマット（en-US ロケール既定の `M/D/YYYY, h:mm:ss AM`）
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// リマインダー ID
///
/// クライアントから渡される不透明な識別子。形式は検証しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ReminderId(String);

impl ReminderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// テスト送信用の ID かどうか
    pub fn is_test_marker(&self) -> bool {
        self.0.starts_with(TEST_MARKER_PREFIX)
    }
}

/// リマインダーの予定時刻
///
/// クライアントから受け取った ISO 8601 文字列をそのまま保持し、
/// パースできた場合のみ日時として解釈する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTime {
    raw:    String,
    parsed: Option<DateTime<FixedOffset>>,
}

impl ScheduledTime {
    /// ISO 8601 文字列から予定時刻を作成する
    ///
    /// オフセットなしの値と日付のみの値（その日の 0 時）は UTC として扱う。
    /// オフセットはコロンの有無どちらも受け付ける（`+09:00` / `+0900`）。
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = DateTime::parse_from_rfc3339(&raw)
            .or_else(|_| DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .ok()
            .or_else(|| parse_naive(&raw).map(|naive| naive.and_utc().fixed_offset()));

        Self { raw, parsed }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<DateTime<FixedOffset>> {
        self.parsed
    }

    /// メール本文用の人間向け表記を返す
    ///
    /// サーバーのタイムゾーン（UTC）で表記する。パースできない値はそのまま返す。
    pub fn display(&self) -> String {
        match self.parsed {
            Some(dt) => dt.with_timezone(&Utc).format(DISPLAY_FORMAT).to_string(),
            None => self.raw.clone(),
        }
    }
}

/// オフセットなしの日時、または日付のみの値をパースする
fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
