//! Plain-text email message builder.

use crate::payload::{PayloadError, PayloadResult};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Email draft as produced by the mail agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub cc: String,
    #[serde(default)]
    pub bcc: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

/// Provider send request: the MIME message in URL-safe base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub raw: String,
    /// Rendered MIME text, kept for dry-run display.
    #[serde(skip)]
    pub message: String,
}

/// Builds the send payload; `to`, `subject` and `body` are required.
pub fn build_email_payload(draft: &EmailDraft) -> PayloadResult<EmailPayload> {
    let to = required("to", &draft.to)?;
    let subject = required("subject", &draft.subject)?;
    let body = required("body", &draft.body)?;
    let cc = draft.cc.trim();
    let bcc = draft.bcc.trim();

    let mut headers = vec![
        "Content-Type: text/plain; charset=\"utf-8\"".to_string(),
        "MIME-Version: 1.0".to_string(),
        "Content-Transfer-Encoding: 8bit".to_string(),
        format!("To: {}", single_line(to)),
    ];
    if !cc.is_empty() {
        headers.push(format!("Cc: {}", single_line(cc)));
    }
    if !bcc.is_empty() {
        headers.push(format!("Bcc: {}", single_line(bcc)));
    }
    headers.push(format!("Subject: {}", single_line(subject)));

    let message = format!("{}\r\n\r\n{}", headers.join("\r\n"), body);
    Ok(EmailPayload {
        raw: URL_SAFE.encode(message.as_bytes()),
        message,
    })
}

fn required<'a>(field: &'static str, value: &'a str) -> PayloadResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::MissingField(field));
    }
    Ok(trimmed)
}

// Header values must not smuggle extra header lines.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
