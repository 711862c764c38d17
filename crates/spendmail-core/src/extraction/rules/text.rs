//! Passthrough processing for `default`-typed fields.

use super::notes::UNKNOWN_NOTE;

/// Trim and lowercase; empty text becomes `unknown`.
pub fn process_default(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        UNKNOWN_NOTE.to_string()
    } else {
        trimmed.to_lowercase()
    }
}
