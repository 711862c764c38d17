//! Normalized transaction records built from extraction results.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::fields::ExtractionResult;

/// Category used when a message carries no note.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// A single spending transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Lowercased note, or `unknown`.
    pub category: String,

    /// Transaction amount.
    pub amount: f64,

    /// When the transaction happened.
    pub timestamp: NaiveDateTime,
}

impl Transaction {
    pub fn new(category: impl Into<String>, amount: f64, timestamp: NaiveDateTime) -> Self {
        Self {
            category: category.into(),
            amount,
            timestamp,
        }
    }

    /// Build a transaction from extracted fields.
    ///
    /// Returns `None` when the amount or date is missing or has the wrong
    /// type. Field names are matched case-insensitively.
    pub fn from_extraction(result: &ExtractionResult) -> Option<Self> {
        let amount = result.get_ignore_case("amount")?.as_amount()?;
        let timestamp = result.get_ignore_case("date")?.as_date()?;

        let category = result
            .get_ignore_case("note")
            .and_then(|v| v.as_text())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| UNKNOWN_CATEGORY.to_string(), str::to_lowercase);

        Some(Self {
            category,
            amount,
            timestamp,
        })
    }
}
