//! # Notify Service サーバー
//!
//! リマインダー通知メールを送信する HTTP サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `NOTIFY_PORT` | No | ポート番号（デフォルト: `8000`） |
//! | `NOTIFICATION_BACKEND` | No | `resend` / `smtp` / `noop`（デフォルト: `resend`） |
//! | `RESEND_API_KEY` | backend=resend | Resend API キー。未設定なら送信要求は 500 になる |
//! | `RESEND_API_URL` | No | Resend API のベース URL |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元 |
//! | `SMTP_HOST` / `SMTP_PORT` | No | backend=smtp の接続先（デフォルト: `localhost:1025`） |
//! | `SUPABASE_URL` | No | 配信記録の更新先 |
//! | `SUPABASE_SERVICE_ROLE_KEY` | No | 配信記録の更新に使う service role キー |
//! | `MANAGE_REMINDERS_URL` | No | メール内リンクの遷移先 |
//! | `NOTIFY_FAIL_FAST` | No | `true` で送信サービス未設定時に起動を失敗させる |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! RESEND_API_KEY=re_... cargo run -p greenroutine-notify-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use greenroutine_notify_service::{
    app_builder::{build_app, build_delivery_records, build_sender},
    config::NotifyConfig,
    handler::ReminderMailState,
    usecase::{ReminderMailUseCase, TemplateRenderer},
};
use greenroutine_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Notify Service のエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. 依存の組み立てとルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("notify-service"));
    let _tracing_guard = tracing::info_span!("app", service = "notify-service").entered();

    let config = NotifyConfig::from_env().context("設定の読み込みに失敗しました")?;

    if !config.notification.is_configured() {
        if config.fail_fast {
            anyhow::bail!(
                "通知バックエンド {} の設定が不足しています（RESEND_API_KEY）",
                config.notification.backend
            );
        }
        tracing::warn!(
            backend = %config.notification.backend,
            "送信サービスが未設定です。送信要求には設定エラーを返します"
        );
    }

    let sender = build_sender(&config.notification);
    let delivery_records = build_delivery_records(&config.datastore);
    let template_renderer =
        TemplateRenderer::new().context("メールテンプレートの初期化に失敗しました")?;

    let usecase = ReminderMailUseCase::new(
        sender,
        template_renderer,
        delivery_records,
        config.notification.manage_reminders_url.clone(),
    );
    let app = build_app(Arc::new(ReminderMailState { usecase }));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notify Service を起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
