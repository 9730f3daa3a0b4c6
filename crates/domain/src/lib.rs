//! # GreenRoutine ドメイン層
//!
//! リマインダー通知メールに関するドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! notify-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（HTTP クライアント、SMTP、データストア）に
//! 一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`reminder`] - リマインダー識別子と予定時刻
//! - [`notification`] - 通知イベント、メールメッセージ、通知エラー
//!
//! ## 使用例
//!
//! ```rust
//! use greenroutine_domain::reminder::ReminderId;
//!
//! let id = ReminderId::new("test-1700000000000");
//! assert!(id.is_test_marker());
//! ```

pub mod notification;
pub mod reminder;

pub use notification::{EmailMessage, NotificationError, ReminderNotification, SentMessageId};
pub use reminder::{ReminderId, ScheduledTime};
