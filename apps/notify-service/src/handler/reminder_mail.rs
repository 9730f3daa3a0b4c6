//! # リマインダーメール送信ハンドラ
//!
//! ```text
//! POST /send-reminder-email
//! ```
//!
//! ## リクエスト例
//!
//! ```json
//! {
//!   "reminderId": "abc123",
//!   "userEmail": "a@b.com",
//!   "userName": "Ann",
//!   "reminderTitle": "Turn off lights",
//!   "reminderDescription": null,
//!   "reminderTime": "2025-01-01T08:00:00Z"
//! }
//! ```
//!
//! ## レスポンス
//!
//! - 200: `{"success": true, "messageId": "<プロバイダのメッセージ ID>"}`
//! - 400: プロバイダが送信を拒否（`{"error": "..."}`）
//! - 500: 送信サービス未設定、不正なボディ、通信失敗（`{"error": "..."}`）

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use greenroutine_domain::{
    notification::ReminderNotification,
    reminder::{ReminderId, ScheduledTime},
};
use serde::{Deserialize, Serialize};

use crate::{error::DispatchError, usecase::ReminderMailUseCase};

/// リマインダーメールハンドラの State
pub struct ReminderMailState {
    pub usecase: ReminderMailUseCase,
}

/// 送信リクエスト
///
/// フィールドの形式（メールアドレス、日時）は検証しない。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReminderEmailRequest {
    pub reminder_id:          String,
    pub user_email:           String,
    pub user_name:            String,
    pub reminder_title:       String,
    #[serde(default)]
    pub reminder_description: Option<String>,
    pub reminder_time:        String,
}

impl From<SendReminderEmailRequest> for ReminderNotification {
    fn from(req: SendReminderEmailRequest) -> Self {
        Self {
            reminder_id:     ReminderId::new(req.reminder_id),
            recipient_email: req.user_email,
            recipient_name:  req.user_name,
            title:           req.reminder_title,
            description:     req.reminder_description,
            scheduled_at:    ScheduledTime::parse(req.reminder_time),
        }
    }
}

/// 送信成功レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReminderEmailResponse {
    pub success:    bool,
    pub message_id: String,
}

/// リクエストボディを JSON としてパースする
fn parse_request(body: &[u8]) -> Result<SendReminderEmailRequest, DispatchError> {
    serde_json::from_slice(body).map_err(|e| DispatchError::MalformedBody(e.to_string()))
}

/// リマインダーメールを 1 通送信する
///
/// 送信サービスが未設定の場合は、ボディの内容にかかわらず
/// 外部サービスに接続せず 500 を返す。
///
/// ボディは `Content-Type` を問わず JSON として解釈する。
#[tracing::instrument(skip_all)]
pub async fn send_reminder_email(
    State(state): State<Arc<ReminderMailState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SendReminderEmailResponse>, DispatchError> {
    if !state.usecase.is_configured() {
        return Err(DispatchError::NotConfigured);
    }

    let body = body.map_err(|rejection| DispatchError::MalformedBody(rejection.body_text()))?;
    let req = parse_request(&body)?;

    let message_id = state.usecase.dispatch(req.into()).await?;

    Ok(Json(SendReminderEmailResponse {
        success:    true,
        message_id: message_id.to_string(),
    }))
}
