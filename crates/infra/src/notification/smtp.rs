//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。
//!
//! SMTP はメッセージ ID を返さないため、送信成功時にローカルで採番する。

use async_trait::async_trait;
use greenroutine_domain::notification::{EmailMessage, NotificationError, SentMessageId};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Message, MultiPart, SinglePart, header::ContentType},
};

use super::NotificationSender;

/// SMTP 通知送信
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_address`: 送信元メールアドレス
    pub fn new(host: &str, port: u16, from_address: String) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }

    /// 送信するメッセージを組み立てる
    ///
    /// アドレスの形式不正はプロバイダ拒否と同じく入力側の問題として扱う。
    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| NotificationError::Rejected(format!("Invalid `from` field: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| NotificationError::Rejected(format!("Invalid `to` field: {e}")))?)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<SentMessageId, NotificationError> {
        let message = self.build_message(email)?;

        self.transport.send(message).await.map_err(|e| {
            // 5xx 応答（宛先拒否など）はプロバイダ拒否として扱う
            if e.is_permanent() {
                NotificationError::Rejected(e.to_string())
            } else {
                NotificationError::SendFailed(format!("SMTP 送信失敗: {e}"))
            }
        })?;

        Ok(SentMessageId::generate())
    }
}
