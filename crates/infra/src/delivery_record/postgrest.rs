//! PostgREST 配信記録実装
//!
//! Supabase の REST API（PostgREST）に service role キーで接続し、
//! `reminders` テーブルの `email_sent` を更新する。
//!
//! ```text
//! PATCH {SUPABASE_URL}/rest/v1/reminders?id=eq.{reminder_id}
//! apikey: {service_key}
//! Authorization: Bearer {service_key}
//! Prefer: return=minimal
//!
//! {"email_sent": true}
//! ```

use async_trait::async_trait;
use greenroutine_domain::reminder::ReminderId;
use serde::Serialize;

use super::DeliveryRecordRepository;
use crate::error::InfraError;

/// 更新対象のテーブル
const REMINDERS_TABLE: &str = "reminders";

#[derive(Debug, Serialize)]
struct EmailSentPatch {
    email_sent: bool,
}

/// PostgREST 配信記録リポジトリ
///
/// service role キーを保持するため `Debug` は実装しない。
pub struct PostgrestDeliveryRecordRepository {
    client:      reqwest::Client,
    base_url:    String,
    service_key: String,
}

impl PostgrestDeliveryRecordRepository {
    /// # 引数
    ///
    /// - `base_url`: Supabase プロジェクト URL（例: `https://xyz.supabase.co`）
    /// - `service_key`: service role キー（RLS をバイパスする特権キー）
    pub fn new(base_url: &str, service_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    fn record_url(&self, reminder_id: &ReminderId) -> String {
        format!(
            "{}/rest/v1/{REMINDERS_TABLE}?id=eq.{}",
            self.base_url,
            urlencoding::encode(reminder_id.as_str())
        )
    }
}

#[async_trait]
impl DeliveryRecordRepository for PostgrestDeliveryRecordRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%reminder_id))]
    async fn mark_email_sent(&self, reminder_id: &ReminderId) -> Result<(), InfraError> {
        let response = self
            .client
            .patch(self.record_url(reminder_id))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(&EmailSentPatch { email_sent: true })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(InfraError::datastore(status.as_u16(), body))
    }
}
