//! Message body decoding.
//!
//! Turns a raw payload tree into one plain-text string. Decoding never fails
//! outward: a missing or undecodable body yields an empty string and a
//! diagnostic.

mod markup;

pub use markup::{collapse_whitespace, flatten_text, looks_like_html, strip_html};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::models::message::{MessagePart, RawMessage};

/// base64url, padded or not.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a message body to text, returning an empty string on failure.
pub fn decode_body(message: &RawMessage) -> String {
    match try_decode_body(message) {
        Ok(text) => text,
        Err(DecodeError::MissingBody) => {
            debug!("Message {} has no body data", message_label(message));
            String::new()
        }
        Err(e) => {
            warn!("Failed to decode message {}: {}", message_label(message), e);
            String::new()
        }
    }
}

/// Decode a message body to text.
///
/// Multipart payloads use the first `text/plain` part found depth-first;
/// otherwise the top-level body is decoded.
pub fn try_decode_body(message: &RawMessage) -> Result<String, DecodeError> {
    let payload = &message.payload;

    let data = if payload.parts.is_empty() {
        payload.data()
    } else {
        find_plain_text(payload).and_then(MessagePart::data)
    };

    match data {
        Some(data) if !data.trim().is_empty() => decode_data(data),
        _ => Err(DecodeError::MissingBody),
    }
}

/// Encode text as unpadded base64url body data.
pub fn encode_body(text: &str) -> String {
    BODY_ENGINE.encode(text)
}

/// Decode base64url data as UTF-8. Standard-alphabet characters and line
/// breaks are tolerated.
pub fn decode_data(data: &str) -> Result<String, DecodeError> {
    let normalized: String = data
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    let bytes = BODY_ENGINE
        .decode(normalized)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| DecodeError::Utf8(e.to_string()))
}

fn find_plain_text(part: &MessagePart) -> Option<&MessagePart> {
    part.parts.iter().find_map(|child| {
        if child.is_plain_text() {
            Some(child)
        } else {
            find_plain_text(child)
        }
    })
}

fn message_label(message: &RawMessage) -> &str {
    message.id.as_deref().unwrap_or("<no id>")
}
