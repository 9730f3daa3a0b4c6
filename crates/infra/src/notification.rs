//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: Resend（本番用）、SMTP（Mailpit 開発用）、Noop（ログのみ）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **リトライなし**: 1 回の呼び出しにつき送信は 1 回だけ試行する

mod noop;
mod resend;
mod smtp;

use async_trait::async_trait;
use greenroutine_domain::notification::{EmailMessage, NotificationError, SentMessageId};
pub use noop::NoopNotificationSender;
pub use resend::{DEFAULT_RESEND_API_URL, ResendNotificationSender};
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信し、プロバイダが払い出したメッセージ ID を返す
    ///
    /// プロバイダが送信を拒否した場合は [`NotificationError::Rejected`]、
    /// 通信に失敗した場合は [`NotificationError::SendFailed`] を返す。
    async fn send_email(&self, email: &EmailMessage) -> Result<SentMessageId, NotificationError>;
}

/// 送信バックエンド
///
/// `NOTIFICATION_BACKEND` 環境変数の値（小文字）に対応する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// Resend API 経由で送信（本番）
    #[default]
    Resend,
    /// SMTP 経由で送信（Mailpit など）
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}
