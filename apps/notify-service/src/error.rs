//! # Notify Service エラー定義
//!
//! 送信処理のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは常に `{"error": "<メッセージ>"}` の形式。
//!
//! | エラー | ステータス |
//! |-------|----------|
//! | 送信サービス未設定 | 500 |
//! | プロバイダ拒否 | 400 |
//! | その他（通信失敗、テンプレート、不正なボディ） | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use greenroutine_domain::notification::NotificationError;
use greenroutine_shared::event_log::error as log_error;
use serde::Serialize;
use thiserror::Error;

/// 送信サービス未設定時にクライアントへ返す固定メッセージ
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Email service not configured. Please set up RESEND_API_KEY.";

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Notify Service で発生するエラー
#[derive(Debug, Error)]
pub enum DispatchError {
    /// 送信サービスが設定されていない
    #[error("Email service not configured. Please set up RESEND_API_KEY.")]
    NotConfigured,

    /// プロバイダが送信を拒否した
    #[error("{0}")]
    ProviderRejected(String),

    /// リクエストボディを解釈できない
    #[error("{0}")]
    MalformedBody(String),

    /// その他の失敗
    #[error("{0}")]
    Unexpected(String),
}

impl From<NotificationError> for DispatchError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotConfigured => Self::NotConfigured,
            NotificationError::Rejected(msg) => Self::ProviderRejected(msg),
            NotificationError::SendFailed(msg) | NotificationError::TemplateFailed(msg) => {
                Self::Unexpected(msg)
            }
        }
    }
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProviderRejected(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::MalformedBody(_) | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotConfigured => tracing::error!(
                error.category = log_error::category::CONFIGURATION,
                error.kind = log_error::kind::MISSING_CREDENTIAL,
                "メール送信サービスが設定されていません"
            ),
            Self::ProviderRejected(msg) => tracing::warn!(
                error.category = log_error::category::EXTERNAL_SERVICE,
                error.kind = log_error::kind::EMAIL_PROVIDER,
                error = %msg,
                "プロバイダが送信を拒否"
            ),
            Self::MalformedBody(msg) => tracing::warn!(
                error.category = log_error::category::REQUEST,
                error.kind = log_error::kind::MALFORMED_BODY,
                error = %msg,
                "リクエストボディを解釈できません"
            ),
            Self::Unexpected(msg) => tracing::error!(
                error.category = log_error::category::EXTERNAL_SERVICE,
                error.kind = log_error::kind::EMAIL_PROVIDER,
                error = %msg,
                "リマインダーメールの送信に失敗"
            ),
        }

        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
