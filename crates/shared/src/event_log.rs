//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で調査しやすいよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` / `tracing::warn!` に `error.category` + `error.kind` フィールドを
//! 直接追加する。定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const NOTIFICATION: &str = "notification";
        pub const DELIVERY_RECORD: &str = "delivery_record";
    }

    /// イベントアクション
    pub mod action {
        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";

        // 配信記録
        pub const DELIVERY_RECORD_UPDATED: &str = "delivery_record.updated";
        pub const DELIVERY_RECORD_UPDATE_FAILED: &str = "delivery_record.update_failed";
        pub const DELIVERY_RECORD_SKIPPED: &str = "delivery_record.skipped";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const REMINDER: &str = "reminder";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const SKIPPED: &str = "skipped";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 設定不備
        pub const CONFIGURATION: &str = "configuration";
        /// 外部サービス呼び出し（メールプロバイダ、データストア）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// クライアント入力
        pub const REQUEST: &str = "request";
    }

    /// エラー種別
    pub mod kind {
        pub const MISSING_CREDENTIAL: &str = "missing_credential";
        pub const EMAIL_PROVIDER: &str = "email_provider";
        pub const DATASTORE: &str = "datastore";
        pub const TEMPLATE: &str = "template";
        pub const MALFORMED_BODY: &str = "malformed_body";
    }
}
