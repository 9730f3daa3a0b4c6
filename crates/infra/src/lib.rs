//! # GreenRoutine インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: Resend API / SMTP / Noop による [`NotificationSender`] 実装
//! - **配信記録**: リマインダー行の `email_sent` フラグ更新（Supabase PostgREST）
//!
//! ## 依存関係
//!
//! ```text
//! notify-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信トレイトと実装
//! - [`delivery_record`] - 配信済みフラグ更新リポジトリ
//! - [`error`] - インフラ層エラー定義

pub mod delivery_record;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;

pub use delivery_record::{
    DeliveryRecordRepository,
    NoopDeliveryRecordRepository,
    PostgrestDeliveryRecordRepository,
};
pub use error::{InfraError, InfraErrorKind};
pub use notification::{
    NoopNotificationSender,
    NotificationBackend,
    NotificationSender,
    ResendNotificationSender,
    SmtpNotificationSender,
};
