//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、送信ロジックはユースケース層に委譲する

pub mod health;
pub mod reminder_mail;

pub use health::health_check;
pub use reminder_mail::{
    ReminderMailState,
    SendReminderEmailRequest,
    SendReminderEmailResponse,
    send_reminder_email,
};
