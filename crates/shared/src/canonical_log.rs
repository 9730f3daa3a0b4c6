//! # Canonical Log Line ミドルウェア
//!
//! 1 リクエストにつき 1 行、完了時のサマリログを出力する tower Layer。
//! TraceLayer のスパン内に置くと `request_id` が自動的に付与される。
//!
//! ## 出力フィールド
//!
//! | フィールド | 例 |
//! |-----------|----|
//! | `http.method` | `POST` |
//! | `http.path` | `/send-reminder-email` |
//! | `http.status_code` | `400` |
//! | `http.outcome` | `client_error` |
//! | `http.latency_ms` | `182` |
//!
//! プロバイダ拒否（400）は呼び出し側の問題なので info、5xx は warn、
//! Service 自体のエラーは error で出力する。
//!
//! プリフライト（`OPTIONS`）とヘルスチェック（`/health` 完全一致）は出力しない。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Method, Request, Response, StatusCode};
use tower::{Layer, Service};

const HEALTH_PATH: &str = "/health";

/// Canonical Log Line を出力する Layer
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

/// 完了時に出力するサマリ
struct RequestSummary {
    method: Method,
    path:   String,
    start:  Instant,
}

impl RequestSummary {
    /// サマリ対象なら計測を開始する
    fn begin<B>(req: &Request<B>) -> Option<Self> {
        let path = req.uri().path();
        if req.method() == Method::OPTIONS || path == HEALTH_PATH {
            return None;
        }
        Some(Self {
            method: req.method().clone(),
            path:   path.to_owned(),
            start:  Instant::now(),
        })
    }

    fn emit<B, E: std::fmt::Display>(&self, result: &Result<Response<B>, E>) {
        let latency_ms = self.start.elapsed().as_millis() as u64;

        let status = match result {
            Ok(response) => response.status(),
            Err(err) => {
                tracing::error!(
                    log.r#type = "canonical",
                    http.method = %self.method,
                    http.path = %self.path,
                    http.latency_ms = latency_ms,
                    error.message = %err,
                    "リクエスト処理エラー"
                );
                return;
            }
        };

        let outcome = outcome_of(status);
        if status.is_server_error() {
            tracing::warn!(
                log.r#type = "canonical",
                http.method = %self.method,
                http.path = %self.path,
                http.status_code = status.as_u16(),
                http.outcome = outcome,
                http.latency_ms = latency_ms,
                "リクエスト完了（サーバーエラー）"
            );
        } else {
            tracing::info!(
                log.r#type = "canonical",
                http.method = %self.method,
                http.path = %self.path,
                http.status_code = status.as_u16(),
                http.outcome = outcome,
                http.latency_ms = latency_ms,
                "リクエスト完了"
            );
        }
    }
}

fn outcome_of(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server_error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みの inner を取り出し、代わりにクローンを残す
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let summary = RequestSummary::begin(&req);

        Box::pin(async move {
            let result = inner.call(req).await;
            if let Some(summary) = summary {
                summary.emit(&result);
            }
            result
        })
    }
}
