//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンでリマインダーメールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **HTML エスケープ**: `.html` テンプレートは tera の autoescape が有効。
//!   ユーザー入力（表示名・タイトル・説明）はすべてエスケープされる。
//!   `/` は日時表記（`1/1/2025`）を崩すためエスケープ対象から外す
//! - **件名パターン**: `Reminder: {title}`
//! - **説明の省略**: 説明がない（または空の）場合は要素ごと出力しない

use greenroutine_domain::notification::{EmailMessage, NotificationError, ReminderNotification};
use tera::{Context, Tera};

const HTML_TEMPLATE: &str = "reminder.html";
const TEXT_TEMPLATE: &str = "reminder.txt";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// `include_str!` で埋め込んだテンプレートを tera に登録する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();
        engine.set_escape_fn(escape_html);

        engine
            .add_raw_templates(vec![
                (
                    HTML_TEMPLATE,
                    include_str!("../../../templates/notifications/reminder.html"),
                ),
                (
                    TEXT_TEMPLATE,
                    include_str!("../../../templates/notifications/reminder.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// リマインダー通知からメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `notification`: リマインダー通知
    /// - `manage_reminders_url`: リマインダー管理画面へのリンク
    pub fn render(
        &self,
        notification: &ReminderNotification,
        manage_reminders_url: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("recipient_name", &notification.recipient_name);
        context.insert("title", &notification.title);
        context.insert("description", &notification.display_description());
        context.insert("scheduled_at", &notification.scheduled_at.display());
        context.insert("manage_reminders_url", manage_reminders_url);

        let html_body = self
            .engine
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(TEXT_TEMPLATE, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipient_email.clone(),
            subject: format!("Reminder: {}", notification.title),
            html_body,
            text_body,
        })
    }
}

/// HTML 特殊文字をエスケープする
///
/// tera 標準のエスケープから `/` の変換を除いたもの。
fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}
