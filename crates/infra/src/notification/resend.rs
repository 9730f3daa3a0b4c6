//! Resend 通知送信実装
//!
//! Resend の `POST /emails` API を使用してメールを送信する。
//! 本番環境で使用する。
//!
//! ## エラーの分類
//!
//! | 状況 | 返すエラー |
//! |------|-----------|
//! | 2xx 以外のステータス | `Rejected`（Resend の `message` をそのまま渡す） |
//! | 接続失敗・タイムアウト | `SendFailed` |
//! | 2xx だがボディが読めない | `SendFailed` |

use async_trait::async_trait;
use greenroutine_domain::notification::{EmailMessage, NotificationError, SentMessageId};
use serde::{Deserialize, Serialize};

use super::NotificationSender;

/// Resend API のデフォルトベース URL
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// 送信リクエスト
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from:    &'a str,
    to:      [&'a str; 1],
    subject: &'a str,
    html:    &'a str,
    text:    &'a str,
}

/// 送信成功レスポンス
#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// エラーレスポンス
#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    message: String,
}

/// Resend 通知送信
///
/// API キーを保持するため `Debug` は実装しない。
pub struct ResendNotificationSender {
    client:       reqwest::Client,
    api_url:      String,
    api_key:      String,
    from_address: String,
}

impl ResendNotificationSender {
    /// 新しい Resend 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `api_url`: Resend API のベース URL（通常は [`DEFAULT_RESEND_API_URL`]）
    /// - `api_key`: Resend API キー
    /// - `from_address`: 送信元（例: `GreenRoutine <onboarding@resend.dev>`）
    pub fn new(api_url: &str, api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl NotificationSender for ResendNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<SentMessageId, NotificationError> {
        let url = format!("{}/emails", self.api_url);
        let request = SendEmailRequest {
            from:    &self.from_address,
            to:      [&email.to],
            subject: &email.subject,
            html:    &email.html_body,
            text:    &email.text_body,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Resend 送信失敗: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let body = response.json::<SendEmailResponse>().await.map_err(|e| {
                NotificationError::SendFailed(format!("Resend レスポンス解析失敗: {e}"))
            })?;
            return Ok(SentMessageId::new(body.id));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ResendErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    format!("Resend returned status {status}")
                } else {
                    body
                }
            });

        Err(NotificationError::Rejected(message))
    }
}
