//! Note extraction for payment alerts.

use super::patterns::NOTE;

/// Value used when no note is present.
pub const UNKNOWN_NOTE: &str = "unknown";

/// Extract the single word following "Note", lowercased.
///
/// Only one token is taken, so institution boilerplate after the note
/// ("Bank Reference No. ...") never leaks into the value.
pub fn process_note(text: &str) -> String {
    NOTE.captures(text)
        .map_or_else(|| UNKNOWN_NOTE.to_string(), |caps| caps[1].to_lowercase())
}
