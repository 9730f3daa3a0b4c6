//! # 配信記録
//!
//! リマインダー行の `email_sent` フラグを更新するリポジトリ。
//!
//! ## 設計方針
//!
//! - **単一の無条件書き込み**: 楽観的ロックや CAS は行わない。同じ ID への
//!   並行更新は最終的に必ず `true` に収束する（冪等）
//! - **読み取りなし**: フラグを読むことはない
//! - **未設定時は Noop**: データストアの接続情報がなければ更新をスキップする

mod noop;
mod postgrest;

use async_trait::async_trait;
use greenroutine_domain::reminder::ReminderId;
pub use noop::NoopDeliveryRecordRepository;
pub use postgrest::PostgrestDeliveryRecordRepository;

use crate::error::InfraError;

/// 配信記録リポジトリ
#[async_trait]
pub trait DeliveryRecordRepository: Send + Sync {
    /// 指定したリマインダーの `email_sent` を `true` にする
    async fn mark_email_sent(&self, reminder_id: &ReminderId) -> Result<(), InfraError>;
}
