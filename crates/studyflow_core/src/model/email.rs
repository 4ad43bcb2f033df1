//! Mail message model.
//!
//! Raw messages mirror the provider's full-format message: a tree of MIME
//! parts whose bodies carry URL-safe base64 `data`.

use serde::{Deserialize, Serialize};

/// `name: value` header line of a message part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// One MIME part; the message payload is the root part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<MessageHeader>,
    #[serde(default)]
    pub body: PartBody,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl MessagePart {
    pub fn leaf(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            body: PartBody {
                data: Some(data.into()),
            },
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(MessageHeader {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_part(mut self, part: MessagePart) -> Self {
        self.parts.push(part);
        self
    }

    /// First header named `name`, compared ASCII case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }
}

/// Raw message fetched from an external mail provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmail {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub payload: MessagePart,
}

/// Canonical message emitted by the mail normalizer.
///
/// Missing headers become empty strings; `date` is the header text as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEmail {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
    pub body: String,
}
