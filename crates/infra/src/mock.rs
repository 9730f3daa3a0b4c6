//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! greenroutine-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use greenroutine_domain::{
    notification::{EmailMessage, NotificationError, SentMessageId},
    reminder::ReminderId,
};

use crate::{
    delivery_record::DeliveryRecordRepository,
    error::InfraError,
    notification::NotificationSender,
};

// ===== MockNotificationSender =====

/// モック送信の結果
#[derive(Debug, Clone)]
enum SendOutcome {
    Success(String),
    Rejected(String),
    Failed(String),
}

/// 送信したメールを記録するモック送信
///
/// 結果はコンストラクタで固定する。失敗時も呼び出しは記録される。
#[derive(Clone)]
pub struct MockNotificationSender {
    outcome: SendOutcome,
    sent:    Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockNotificationSender {
    /// 常に成功し、固定のメッセージ ID を返す
    pub fn new() -> Self {
        Self::with_outcome(SendOutcome::Success("mock-message-id".to_string()))
    }

    /// 常にプロバイダ拒否を返す
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::with_outcome(SendOutcome::Rejected(message.into()))
    }

    /// 常に通信失敗を返す
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(SendOutcome::Failed(message.into()))
    }

    fn with_outcome(outcome: SendOutcome) -> Self {
        Self {
            outcome,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 送信を試みたメールの一覧
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<SentMessageId, NotificationError> {
        self.sent.lock().unwrap().push(email.clone());

        match &self.outcome {
            SendOutcome::Success(id) => Ok(SentMessageId::new(id.clone())),
            SendOutcome::Rejected(msg) => Err(NotificationError::Rejected(msg.clone())),
            SendOutcome::Failed(msg) => Err(NotificationError::SendFailed(msg.clone())),
        }
    }
}

// ===== MockDeliveryRecordRepository =====

/// `email_sent` フラグをメモリ上に保持するモック
#[derive(Clone, Default)]
pub struct MockDeliveryRecordRepository {
    records:  Arc<Mutex<HashMap<ReminderId, bool>>>,
    attempts: Arc<Mutex<Vec<ReminderId>>>,
    fail:     bool,
}

impl MockDeliveryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に更新に失敗するモック（試行は記録する）
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `email_sent = false` のレコードを登録する
    pub fn insert_record(&self, reminder_id: ReminderId) {
        self.records.lock().unwrap().insert(reminder_id, false);
    }

    /// レコードの `email_sent` を返す（レコードがなければ `None`）
    pub fn email_sent(&self, reminder_id: &ReminderId) -> Option<bool> {
        self.records.lock().unwrap().get(reminder_id).copied()
    }

    /// 更新を試みた ID の一覧（呼び出し順）
    pub fn attempts(&self) -> Vec<ReminderId> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryRecordRepository for MockDeliveryRecordRepository {
    async fn mark_email_sent(&self, reminder_id: &ReminderId) -> Result<(), InfraError> {
        self.attempts.lock().unwrap().push(reminder_id.clone());

        if self.fail {
            return Err(InfraError::datastore(503, "mock datastore unavailable"));
        }

        // PostgREST と同様、該当行がなければ何も起きない
        if let Some(sent) = self.records.lock().unwrap().get_mut(reminder_id) {
            *sent = true;
        }
        Ok(())
    }
}
