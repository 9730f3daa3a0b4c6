//! # ユースケース層
//!
//! ハンドラから呼ばれるアプリケーションロジックを配置する。
//!
//! ## モジュール構成
//!
//! - [`reminder_mail`] - リマインダーメールの生成・送信・配信記録

pub mod reminder_mail;

pub use reminder_mail::{ReminderMailUseCase, TemplateRenderer};
