//! Mail message normalization.
//!
//! # Responsibility
//! - Flatten provider messages into `{id, sender, subject, date, snippet, body}`.
//!
//! # Invariants
//! - Headers are looked up case-insensitively; the first match wins.
//! - Body preference: `text/plain` parts, then `text/html` parts, in
//!   depth-first order. A message without parts uses its root body.
//! - A body that is not URL-safe base64 or not UTF-8 is skipped; when no
//!   candidate decodes the body is empty. Normalization never fails.
//! - Output keeps provider order.

use crate::model::email::{MessagePart, NormalizedEmail, RawEmail};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use log::debug;

const PLAIN: &str = "text/plain";
const HTML: &str = "text/html";

/// URL-safe alphabet; providers send body data both padded and unpadded.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Normalizes raw provider messages into the client-facing shape.
pub fn normalize_emails(messages: &[RawEmail]) -> Vec<NormalizedEmail> {
    let normalized = messages.iter().map(normalize_one).collect::<Vec<_>>();
    debug!(
        "event=emails_normalized module=inbox status=ok emails={}",
        normalized.len()
    );
    normalized
}

fn normalize_one(message: &RawEmail) -> NormalizedEmail {
    let payload = &message.payload;
    let header = |name: &str| payload.header(name).unwrap_or_default().trim().to_string();

    NormalizedEmail {
        id: message.id.clone(),
        sender: header("From"),
        subject: header("Subject"),
        date: header("Date"),
        snippet: message.snippet.clone().unwrap_or_default(),
        body: extract_body(&message.id, payload),
    }
}

fn extract_body(message_id: &str, payload: &MessagePart) -> String {
    if payload.parts.is_empty() {
        return payload
            .body
            .data
            .as_deref()
            .and_then(|data| decode_body(message_id, data))
            .unwrap_or_default();
    }

    let mut leaves = Vec::new();
    collect_leaves(payload, &mut leaves);
    for wanted in [PLAIN, HTML] {
        let candidates = leaves
            .iter()
            .filter(|part| part.mime_type.eq_ignore_ascii_case(wanted))
            .filter_map(|part| part.body.data.as_deref());
        for data in candidates {
            if let Some(text) = decode_body(message_id, data) {
                return text;
            }
        }
    }
    String::new()
}

fn collect_leaves<'a>(part: &'a MessagePart, leaves: &mut Vec<&'a MessagePart>) {
    for child in &part.parts {
        if child.parts.is_empty() {
            leaves.push(child);
        } else {
            collect_leaves(child, leaves);
        }
    }
}

fn decode_body(message_id: &str, data: &str) -> Option<String> {
    let bytes = match BODY_ENGINE.decode(data.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(
                "event=email_body_skipped module=inbox status=degraded message_id={message_id} reason=base64 error={err}"
            );
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            debug!(
                "event=email_body_skipped module=inbox status=degraded message_id={message_id} reason=utf8"
            );
            None
        }
    }
}
