//! # Notify Service
//!
//! GreenRoutine のリマインダー通知メールを送信する HTTP サービス。
//!
//! ## 処理の流れ
//!
//! ```text
//! POST /send-reminder-email
//!   → テンプレートレンダリング（HTML + テキスト）
//!   → メール送信（Resend / SMTP / Noop）
//!   → email_sent フラグ更新（Supabase PostgREST、テスト送信では省略）
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - エラーと HTTP レスポンスへの変換
//! - [`handler`] - HTTP ハンドラ
//! - [`usecase`] - 送信ユースケース
//! - [`app_builder`] - 依存の組み立てとルーター構築

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
