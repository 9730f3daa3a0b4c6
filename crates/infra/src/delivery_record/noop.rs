//! Noop 配信記録実装
//!
//! データストアの接続情報が設定されていない場合に使用する。

use async_trait::async_trait;
use greenroutine_domain::reminder::ReminderId;

use super::DeliveryRecordRepository;
use crate::error::InfraError;

/// 何も書き込まない配信記録リポジトリ
#[derive(Debug, Clone)]
pub struct NoopDeliveryRecordRepository;

#[async_trait]
impl DeliveryRecordRepository for NoopDeliveryRecordRepository {
    async fn mark_email_sent(&self, reminder_id: &ReminderId) -> Result<(), InfraError> {
        tracing::warn!(
            reminder_id = %reminder_id,
            "データストアが未設定のため email_sent の更新をスキップ"
        );
        Ok(())
    }
}
