//! # Notify Service 設定
//!
//! 環境変数から Notify Service の設定を読み込む。
//!
//! 空文字列の環境変数は未設定として扱う。読み込みロジックは
//! [`NotifyConfig::from_lookup`] に集約し、テストでは任意のルックアップ関数を渡す。

use std::{env, str::FromStr};

use greenroutine_infra::notification::{DEFAULT_RESEND_API_URL, NotificationBackend};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_FROM_ADDRESS: &str = "GreenRoutine <onboarding@resend.dev>";
const DEFAULT_SMTP_HOST: &str = "localhost";
const DEFAULT_SMTP_PORT: u16 = 1025;
const DEFAULT_MANAGE_REMINDERS_URL: &str = "http://localhost:5173/reminders";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("{name} の値が不正です: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Notify Service の設定
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// 通知設定
    pub notification: NotificationConfig,
    /// 配信記録（データストア）設定
    pub datastore:    DatastoreConfig,
    /// 送信サービス未設定のまま起動しようとした場合に起動を失敗させる
    pub fail_fast:    bool,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `resend`: Resend API 経由で送信（本番、`RESEND_API_KEY` が必要）
/// - `smtp`: Mailpit / SMTP サーバー経由で送信（開発）
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Clone)]
pub struct NotificationConfig {
    pub backend:              NotificationBackend,
    /// Resend API キー（未設定なら送信サービス未設定として扱う）
    pub resend_api_key:       Option<String>,
    pub resend_api_url:       String,
    /// 送信元（`表示名 <アドレス>` 形式可）
    pub from_address:         String,
    pub smtp_host:            String,
    pub smtp_port:            u16,
    /// メール内「Manage Reminders」リンクの遷移先
    pub manage_reminders_url: String,
}

/// 配信記録の設定
///
/// URL とキーの両方が揃っている場合のみ `email_sent` を更新する。
#[derive(Clone, Default)]
pub struct DatastoreConfig {
    /// Supabase プロジェクト URL
    pub url:         Option<String>,
    /// service role キー
    pub service_key: Option<String>,
}

// 秘密情報をログに出さないため Debug は手書きする
impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("backend", &self.backend)
            .field("resend_api_key", &self.resend_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("resend_api_url", &self.resend_api_url)
            .field("from_address", &self.from_address)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("manage_reminders_url", &self.manage_reminders_url)
            .finish()
    }
}

impl std::fmt::Debug for DatastoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatastoreConfig")
            .field("url", &self.url)
            .field("service_key", &self.service_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl NotifyConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意のルックアップ関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: get("NOTIFY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("NOTIFY_PORT", get("NOTIFY_PORT"), DEFAULT_PORT)?,
            notification: NotificationConfig {
                backend:              parse_or(
                    "NOTIFICATION_BACKEND",
                    get("NOTIFICATION_BACKEND").map(|v| v.to_lowercase()),
                    NotificationBackend::default(),
                )?,
                resend_api_key:       get("RESEND_API_KEY"),
                resend_api_url:       get("RESEND_API_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
                from_address:         get("NOTIFICATION_FROM_ADDRESS")
                    .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
                smtp_host:            get("SMTP_HOST")
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port:            parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                manage_reminders_url: get("MANAGE_REMINDERS_URL")
                    .unwrap_or_else(|| DEFAULT_MANAGE_REMINDERS_URL.to_string()),
            },
            datastore: DatastoreConfig {
                url:         get("SUPABASE_URL"),
                service_key: get("SUPABASE_SERVICE_ROLE_KEY"),
            },
            fail_fast: parse_bool("NOTIFY_FAIL_FAST", get("NOTIFY_FAIL_FAST"))?,
        })
    }
}

impl NotificationConfig {
    /// 選択したバックエンドで送信できる設定が揃っているか
    ///
    /// Resend のみ API キーを必要とする。
    pub fn is_configured(&self) -> bool {
        match self.backend {
            NotificationBackend::Resend => self.resend_api_key.is_some(),
            NotificationBackend::Smtp | NotificationBackend::Noop => true,
        }
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: v }),
    }
}

fn parse_bool(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes") => Ok(true),
        Some(v) if matches!(v.as_str(), "false" | "0" | "no") => Ok(false),
        Some(_) => Err(ConfigError::InvalidValue {
            name,
            value: value.unwrap_or_default(),
        }),
    }
}
