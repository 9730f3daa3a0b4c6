//! # リマインダーメール送信エンドポイントのテスト
//!
//! `build_app` で構築したルーターに対し、モックの送信バックエンド・配信記録を注入して
//! HTTP レベルの挙動を検証する。
//!
//! - ステータスコードとレスポンスボディ
//! - 送信サービス未設定時に外部呼び出しが発生しないこと
//! - テスト送信 ID で配信記録が更新されないこと
//! - CORS ヘッダーとプリフライト応答

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    Router,
    body::Body,
    extract::{RawQuery, State},
    routing::{patch, post},
};
use greenroutine_domain::reminder::ReminderId;
use greenroutine_infra::{
    delivery_record::DeliveryRecordRepository,
    mock::{MockDeliveryRecordRepository, MockNotificationSender},
    notification::NotificationSender,
};
use greenroutine_notify_service::{
    app_builder::{build_app, build_delivery_records, build_sender},
    config::NotifyConfig,
    error::NOT_CONFIGURED_MESSAGE,
    handler::ReminderMailState,
    usecase::{ReminderMailUseCase, TemplateRenderer},
};
use http::{Method, Request, Response, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

const MANAGE_URL: &str = "http://localhost:5173/reminders";

fn test_app(
    sender: Option<MockNotificationSender>,
    records: &MockDeliveryRecordRepository,
) -> Router {
    let usecase = ReminderMailUseCase::new(
        sender.map(|s| Arc::new(s) as Arc<dyn NotificationSender>),
        TemplateRenderer::new().unwrap(),
        Arc::new(records.clone()) as Arc<dyn DeliveryRecordRepository>,
        MANAGE_URL.to_string(),
    );
    build_app(Arc::new(ReminderMailState { usecase }))
}

fn request_body(reminder_id: &str) -> Value {
    json!({
        "reminderId": reminder_id,
        "userEmail": "a@b.com",
        "userName": "Ann",
        "reminderTitle": "Turn off lights",
        "reminderDescription": null,
        "reminderTime": "2025-01-01T08:00:00Z"
    })
}

fn post_request(body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/send-reminder-email")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, body: &Value) -> Response<Body> {
    app.oneshot(post_request(body.to_string())).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_送信成功時は200とメッセージidを返す() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    records.insert_record(ReminderId::new("abc123"));
    let app = test_app(Some(sender.clone()), &records);

    let response = send(app, &request_body("abc123")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "messageId": "mock-message-id"})
    );
    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@b.com");
    assert_eq!(sent[0].subject, "Reminder: Turn off lights");
    assert!(sent[0].html_body.contains("1/1/2025, 8:00:00 AM"));
    assert_eq!(records.attempts(), vec![ReminderId::new("abc123")]);
    assert_eq!(records.email_sent(&ReminderId::new("abc123")), Some(true));
}

#[tokio::test]
async fn test_テスト送信idでは配信記録を更新しない() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender.clone()), &records);

    let response = send(app, &request_body("test-1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.call_count(), 1);
    assert!(records.attempts().is_empty());
}

#[tokio::test]
async fn test_送信サービス未設定なら500を返し外部呼び出しをしない() {
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(None, &records);

    let response = send(app, &request_body("abc123")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": NOT_CONFIGURED_MESSAGE})
    );
    assert!(records.attempts().is_empty());
}

#[tokio::test]
async fn test_送信サービス未設定なら不正なボディでも設定エラーを返す() {
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(None, &records);

    let response = app
        .oneshot(post_request("{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": NOT_CONFIGURED_MESSAGE})
    );
}

#[tokio::test]
async fn test_プロバイダ拒否は400とプロバイダのメッセージを返す() {
    let sender = MockNotificationSender::rejecting("The gmail.con domain is not verified.");
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender), &records);

    let response = send(app, &request_body("abc123")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "The gmail.con domain is not verified."})
    );
    assert!(records.attempts().is_empty());
}

#[tokio::test]
async fn test_通信失敗は500を返す() {
    let sender = MockNotificationSender::failing("connection refused");
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender), &records);

    let response = send(app, &request_body("abc123")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "connection refused"})
    );
    assert!(records.attempts().is_empty());
}

#[tokio::test]
async fn test_不正なjsonは500とerrorフィールドを返す() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender.clone()), &records);

    let response = app
        .oneshot(post_request("{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
    assert_eq!(sender.call_count(), 0);
}

#[tokio::test]
async fn test_content_typeがjson以外でもボディをjsonとして解釈する() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    records.insert_record(ReminderId::new("abc123"));
    let app = test_app(Some(sender.clone()), &records);
    let mut body = request_body("abc123");
    body["reminderDescription"] = json!("");

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/send-reminder-email")
                .header("content-type", "text/plain;charset=UTF-8")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "messageId": "mock-message-id"})
    );
    assert_eq!(sender.call_count(), 1);
    assert_eq!(records.email_sent(&ReminderId::new("abc123")), Some(true));
}

#[tokio::test]
async fn test_必須フィールド欠落は500を返す() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender.clone()), &records);

    let response = send(app, &json!({"reminderId": "abc123"})).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(sender.call_count(), 0);
}

#[tokio::test]
async fn test_説明フィールドは省略できる() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender.clone()), &records);
    let mut body = request_body("test-2");
    body.as_object_mut().unwrap().remove("reminderDescription");

    let response = send(app, &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.call_count(), 1);
}

#[tokio::test]
async fn test_配信記録の更新失敗でも200を返す() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::failing();
    let app = test_app(Some(sender), &records);

    let response = send(app, &request_body("abc123")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(records.attempts(), vec![ReminderId::new("abc123")]);
}

#[tokio::test]
async fn test_同一リクエストの並行送信でもフラグはtrueになる() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    records.insert_record(ReminderId::new("abc123"));
    let app = test_app(Some(sender.clone()), &records);
    let body = request_body("abc123");

    let (first, second) = tokio::join!(send(app.clone(), &body), send(app, &body));

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(sender.call_count(), 2);
    assert_eq!(records.email_sent(&ReminderId::new("abc123")), Some(true));
}

#[tokio::test]
async fn test_プリフライトは空ボディとcorsヘッダーを返す() {
    let sender = MockNotificationSender::new();
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(Some(sender.clone()), &records);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/send-reminder-email")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    let allow_headers = header(&response, "access-control-allow-headers")
        .unwrap()
        .to_ascii_lowercase();
    for name in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allow_headers.contains(name), "{name} が許可されること");
    }
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
    assert_eq!(sender.call_count(), 0);
    assert!(records.attempts().is_empty());
}

#[tokio::test]
async fn test_エラー応答にもcorsヘッダーが付く() {
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(None, &records);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/send-reminder-email")
                .header("origin", "http://localhost:5173")
                .header("content-type", "application/json")
                .body(Body::from(request_body("abc123").to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert!(
        header(&response, "access-control-allow-headers")
            .unwrap()
            .contains("apikey")
    );
    assert!(header(&response, "x-request-id").is_some());
}

#[tokio::test]
async fn test_ヘルスチェックは200を返す() {
    let records = MockDeliveryRecordRepository::new();
    let app = test_app(None, &records);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

// ===== 実バックエンドを使った結合テスト =====

#[derive(Default)]
struct StubCalls {
    emails:  Vec<Value>,
    patches: Vec<Option<String>>,
}

type SharedCalls = Arc<Mutex<StubCalls>>;

/// Resend API と PostgREST を兼ねるスタブサーバーを起動する
async fn spawn_provider_stub() -> (String, SharedCalls) {
    let calls: SharedCalls = Arc::default();
    let stub = Router::new()
        .route(
            "/emails",
            post(
                |State(calls): State<SharedCalls>, Json(body): Json<Value>| async move {
                    calls.lock().unwrap().emails.push(body);
                    Json(json!({"id": "re_stub_1"}))
                },
            ),
        )
        .route(
            "/rest/v1/reminders",
            patch(
                |State(calls): State<SharedCalls>, RawQuery(query): RawQuery| async move {
                    calls.lock().unwrap().patches.push(query);
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    (format!("http://{addr}"), calls)
}

fn app_from_config(stub_url: &str) -> Router {
    let vars = [
        ("RESEND_API_KEY", "re_test_key".to_string()),
        ("RESEND_API_URL", stub_url.to_string()),
        ("SUPABASE_URL", stub_url.to_string()),
        ("SUPABASE_SERVICE_ROLE_KEY", "service-key".to_string()),
    ];
    let config = NotifyConfig::from_lookup(|name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.clone())
    })
    .unwrap();

    let usecase = ReminderMailUseCase::new(
        build_sender(&config.notification),
        TemplateRenderer::new().unwrap(),
        build_delivery_records(&config.datastore),
        config.notification.manage_reminders_url.clone(),
    );
    build_app(Arc::new(ReminderMailState { usecase }))
}

#[tokio::test]
async fn test_resend経由で送信しpostgrestのフラグを更新する() {
    let (stub_url, calls) = spawn_provider_stub().await;
    let app = app_from_config(&stub_url);

    let response = send(app, &request_body("abc123")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "messageId": "re_stub_1"})
    );
    let calls = calls.lock().unwrap();
    assert_eq!(calls.emails.len(), 1);
    assert_eq!(calls.emails[0]["to"], json!(["a@b.com"]));
    assert_eq!(calls.emails[0]["subject"], "Reminder: Turn off lights");
    assert_eq!(calls.patches, vec![Some("id=eq.abc123".to_string())]);
}

#[tokio::test]
async fn test_resend経由のテスト送信ではpostgrestを呼ばない() {
    let (stub_url, calls) = spawn_provider_stub().await;
    let app = app_from_config(&stub_url);

    let response = send(app, &request_body("test-xyz")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.emails.len(), 1);
    assert!(calls.patches.is_empty());
}
