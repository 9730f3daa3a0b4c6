//! # 通知
//!
//! リマインダー通知メールに関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **即時送信**: `scheduled_at` は本文表示用のメタデータであり、送信は呼び出し時に行う
//! - **テンプレート分離**: 通知イベントとメール生成は分離（TemplateRenderer は notify-service）
//! - **エラー種別で応答を分ける**: 設定不備・プロバイダ拒否・その他を型で区別する

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reminder::{ReminderId, ScheduledTime};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 送信に必要な認証情報が設定されていない
    #[error("メール送信サービスが設定されていません")]
    NotConfigured,

    /// プロバイダが送信を拒否した（宛先不正、送信元未検証、クォータ超過など）
    #[error("プロバイダが送信を拒否: {0}")]
    Rejected(String),

    /// メール送信に失敗（ネットワークエラーなど）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// プロバイダが払い出したメッセージ ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct SentMessageId(String);

impl SentMessageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// ローカルで ID を採番する（UUID v7）
    ///
    /// ID を返さない送信経路（SMTP / Noop）で使用する。
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// リマインダー通知
///
/// 1 回の送信要求を表す。送信は 1 回だけ試行され、キューイングや重複排除は行わない。
#[derive(Debug, Clone)]
pub struct ReminderNotification {
    pub reminder_id:     ReminderId,
    pub recipient_email: String,
    pub recipient_name:  String,
    pub title:           String,
    /// 説明（空文字列は「なし」として扱う）
    pub description:     Option<String>,
    pub scheduled_at:    ScheduledTime,
}

impl ReminderNotification {
    /// 本文に表示する説明を返す
    ///
    /// 空文字列の説明は表示しない。
    pub fn display_description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// 配信済みフラグを更新すべきかどうか
    ///
    /// テスト送信（`test-` プレフィックス）では永続状態を変更しない。
    pub fn should_record_delivery(&self) -> bool {
        !self.reminder_id.is_test_marker()
    }
}
