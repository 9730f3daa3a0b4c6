//! # アプリケーション構築
//!
//! 設定から依存（送信バックエンド・配信記録）を組み立て、ルーターを構築する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use greenroutine_infra::{
    delivery_record::{
        DeliveryRecordRepository,
        NoopDeliveryRecordRepository,
        PostgrestDeliveryRecordRepository,
    },
    notification::{
        NoopNotificationSender,
        NotificationBackend,
        NotificationSender,
        ResendNotificationSender,
        SmtpNotificationSender,
    },
};
use greenroutine_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{
    config::{DatastoreConfig, NotificationConfig},
    handler::{ReminderMailState, health_check, send_reminder_email},
};

/// ブラウザから送信を許可するリクエストヘッダー
const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// 送信バックエンドを構築する
///
/// 選択したバックエンドに必要な設定が揃っていない場合は `None` を返す。
/// `None` のまま起動したサービスは、送信要求に対して設定エラーを返す。
pub fn build_sender(config: &NotificationConfig) -> Option<Arc<dyn NotificationSender>> {
    match config.backend {
        NotificationBackend::Resend => {
            let api_key = config.resend_api_key.clone()?;
            tracing::info!(api_url = %config.resend_api_url, "通知バックエンド: Resend");
            Some(Arc::new(ResendNotificationSender::new(
                &config.resend_api_url,
                api_key,
                config.from_address.clone(),
            )))
        }
        NotificationBackend::Smtp => {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "通知バックエンド: SMTP"
            );
            Some(Arc::new(SmtpNotificationSender::new(
                &config.smtp_host,
                config.smtp_port,
                config.from_address.clone(),
            )))
        }
        NotificationBackend::Noop => {
            tracing::info!("通知バックエンド: Noop（メール送信なし）");
            Some(Arc::new(NoopNotificationSender))
        }
    }
}

/// 配信記録リポジトリを構築する
///
/// URL と service role キーが揃っていなければ更新をスキップする Noop 実装を返す。
pub fn build_delivery_records(config: &DatastoreConfig) -> Arc<dyn DeliveryRecordRepository> {
    match (&config.url, &config.service_key) {
        (Some(url), Some(service_key)) => Arc::new(PostgrestDeliveryRecordRepository::new(
            url,
            service_key.clone(),
        )),
        _ => {
            tracing::warn!("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY が未設定のため email_sent を更新しません");
            Arc::new(NoopDeliveryRecordRepository)
        }
    }
}

/// ルーターを構築する
pub fn build_app(state: Arc<ReminderMailState>) -> Router {
    // OPTIONS は CorsLayer が空ボディで応答する（ハンドラには到達しない）
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/send-reminder-email", post(send_reminder_email))
        .route("/health", get(health_check))
        .with_state(state)
        // エラー応答を含む全レスポンスに許可ヘッダーを付与する
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(cors)
        // Request ID レイヤー（下に書いたものが外側）
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
