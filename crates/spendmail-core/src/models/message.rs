//! Raw message records as yielded by a message source.

use serde::{Deserialize, Serialize};

/// MIME type of the part selected for extraction.
pub const PLAIN_TEXT: &str = "text/plain";

/// A raw message record.
///
/// Mirrors the shape returned by mail APIs that deliver bodies as
/// base64url-encoded payload trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Source-assigned message identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Root of the payload tree.
    #[serde(default)]
    pub payload: MessagePart,
}

/// A node of the payload tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    /// MIME type tag (e.g. `text/plain`, `multipart/alternative`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Encoded body of this part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PartBody>,

    /// Child parts for multipart messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<MessagePart>,
}

/// Encoded body data of a part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartBody {
    /// base64url-encoded content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl RawMessage {
    /// Create a message with the given payload.
    pub fn new(payload: MessagePart) -> Self {
        Self { id: None, payload }
    }

    /// Set the message identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl MessagePart {
    /// Create a leaf part carrying already-encoded data.
    pub fn leaf(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            body: Some(PartBody {
                data: Some(data.into()),
            }),
            parts: Vec::new(),
        }
    }

    /// Create a multipart node with the given children.
    pub fn multipart(mime_type: impl Into<String>, parts: Vec<MessagePart>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            body: None,
            parts,
        }
    }

    /// Encoded data of this part, if any.
    pub fn data(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.data.as_deref())
    }

    /// Whether this part is tagged as plain text.
    pub fn is_plain_text(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(PLAIN_TEXT))
    }
}
