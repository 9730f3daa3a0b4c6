//! # リマインダーメールユースケース
//!
//! テンプレートレンダリング → メール送信 → 配信記録を統合する。
//!
//! ## 設計方針
//!
//! - **送信結果は呼び出し元に返す**: 送信の成否はそのまま HTTP 応答に反映される
//! - **配信記録はベストエフォート**: `email_sent` の更新失敗はログのみで、送信結果を変えない
//! - **テスト送信**: `test-` で始まる ID では配信記録を一切更新しない
//! - **依存性注入**: `NotificationSender` と `DeliveryRecordRepository` は trait で抽象化

pub mod template_renderer;

use std::sync::Arc;

use greenroutine_domain::notification::{NotificationError, ReminderNotification, SentMessageId};
use greenroutine_infra::{delivery_record::DeliveryRecordRepository, notification::NotificationSender};
use greenroutine_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};
pub use template_renderer::TemplateRenderer;

/// リマインダーメールユースケース
///
/// `sender` が `None` の場合は送信サービス未設定として扱い、
/// どの外部サービスにも接続せずに [`NotificationError::NotConfigured`] を返す。
pub struct ReminderMailUseCase {
    sender: Option<Arc<dyn NotificationSender>>,
    template_renderer: TemplateRenderer,
    delivery_records: Arc<dyn DeliveryRecordRepository>,
    manage_reminders_url: String,
}

impl ReminderMailUseCase {
    pub fn new(
        sender: Option<Arc<dyn NotificationSender>>,
        template_renderer: TemplateRenderer,
        delivery_records: Arc<dyn DeliveryRecordRepository>,
        manage_reminders_url: String,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            delivery_records,
            manage_reminders_url,
        }
    }

    /// 送信サービスが設定済みかどうか
    pub fn is_configured(&self) -> bool {
        self.sender.is_some()
    }

    /// リマインダーメールを 1 通送信する
    ///
    /// 送信に成功した場合のみ配信記録を更新する。配信記録の更新結果は
    /// 戻り値に影響しない。
    ///
    /// # エラー
    ///
    /// - [`NotificationError::NotConfigured`]: 送信サービスが未設定
    /// - [`NotificationError::Rejected`]: プロバイダが送信を拒否
    /// - [`NotificationError::SendFailed`]: 通信失敗
    /// - [`NotificationError::TemplateFailed`]: メール生成失敗
    pub async fn dispatch(
        &self,
        notification: ReminderNotification,
    ) -> Result<SentMessageId, NotificationError> {
        let Some(sender) = &self.sender else {
            return Err(NotificationError::NotConfigured);
        };

        let email = self
            .template_renderer
            .render(&notification, &self.manage_reminders_url)
            .inspect_err(|e| {
                tracing::error!(
                    error.category = log_error::category::CONFIGURATION,
                    error.kind = log_error::kind::TEMPLATE,
                    error = %e,
                    "リマインダーメールのレンダリングに失敗"
                );
            })?;

        let reminder_id = &notification.reminder_id;

        let message_id = match sender.send_email(&email).await {
            Ok(message_id) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::REMINDER,
                    event.entity_id = %reminder_id,
                    event.result = event::result::SUCCESS,
                    notification.recipient = %email.to,
                    notification.message_id = %message_id,
                    "リマインダーメール送信成功"
                );
                message_id
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::REMINDER,
                    event.entity_id = %reminder_id,
                    event.result = event::result::FAILURE,
                    notification.recipient = %email.to,
                    error = %e,
                    "リマインダーメール送信失敗"
                );
                return Err(e);
            }
        };

        self.record_delivery(&notification).await;

        Ok(message_id)
    }

    /// 配信記録を更新する（失敗はログのみ）
    async fn record_delivery(&self, notification: &ReminderNotification) {
        let reminder_id = &notification.reminder_id;

        if !notification.should_record_delivery() {
            log_business_event!(
                event.category = event::category::DELIVERY_RECORD,
                event.action = event::action::DELIVERY_RECORD_SKIPPED,
                event.entity_type = event::entity_type::REMINDER,
                event.entity_id = %reminder_id,
                event.result = event::result::SKIPPED,
                "テスト送信のため配信記録を更新しない"
            );
            return;
        }

        match self.delivery_records.mark_email_sent(reminder_id).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::DELIVERY_RECORD,
                    event.action = event::action::DELIVERY_RECORD_UPDATED,
                    event.entity_type = event::entity_type::REMINDER,
                    event.entity_id = %reminder_id,
                    event.result = event::result::SUCCESS,
                    "配信記録を更新"
                );
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::DELIVERY_RECORD,
                    event.action = event::action::DELIVERY_RECORD_UPDATE_FAILED,
                    event.entity_type = event::entity_type::REMINDER,
                    event.entity_id = %reminder_id,
                    event.result = event::result::FAILURE,
                    "配信記録の更新に失敗"
                );
                tracing::error!(
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::DATASTORE,
                    error = %e,
                    reminder_id = %reminder_id,
                    "email_sent の更新に失敗"
                );
            }
        }
    }
}
