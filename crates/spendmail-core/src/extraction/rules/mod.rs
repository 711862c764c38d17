//! Field processors for payment alert text.
//!
//! Each processor receives the whole flattened message body and locates its
//! own substring of interest; the text is never pre-segmented per field.

pub mod amounts;
pub mod dates;
pub mod notes;
pub mod patterns;
pub mod text;

pub use amounts::{parse_amount, process_amount, AmountExtractor};
pub use dates::{normalize_date_text, process_date, DateExtractor, DateLayout, DEFAULT_DATE_FORMAT};
pub use notes::process_note;
pub use text::process_default;

use crate::error::ExtractionError;
use crate::models::fields::FieldValue;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best candidate for the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all candidates, in preference order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction candidate with a confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Processor types an operator rule may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Amount,
    Date,
    Note,
    Default,
}

impl RuleKind {
    /// All kinds, in lookup order.
    pub const ALL: [Self; 4] = [Self::Amount, Self::Date, Self::Note, Self::Default];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Note => "note",
            Self::Default => "default",
        }
    }

    /// Parse a type name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }
}

/// A resolved field processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processor {
    /// Numeral near the word "amount", else the first numeral.
    Amount,
    /// Date parsed with the bound layout, then the fallback chain.
    Date(String),
    /// Single token after "Note".
    Note,
    /// Trimmed, lowercased text.
    Default,
}

impl Processor {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Amount => RuleKind::Amount,
            Self::Date(_) => RuleKind::Date,
            Self::Note => RuleKind::Note,
            Self::Default => RuleKind::Default,
        }
    }

    /// Run the processor over the message text.
    ///
    /// Only the date processor fails; the others report absence as
    /// [`FieldValue::Null`] or a default string.
    pub fn apply(&self, text: &str) -> Result<FieldValue, ExtractionError> {
        match self {
            Self::Amount => Ok(process_amount(text).into()),
            Self::Date(layout) => process_date(text, Some(layout)).map(FieldValue::Date),
            Self::Note => Ok(FieldValue::Text(process_note(text))),
            Self::Default => Ok(FieldValue::Text(process_default(text))),
        }
    }
}

impl std::fmt::Display for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(layout) => write!(f, "date ({layout})"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}
