//! Error types for the spendmail-core library.

use thiserror::Error;

/// Main error type for the spendmail library.
#[derive(Error, Debug)]
pub enum SpendmailError {
    /// Message body decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Rule configuration or resolution error.
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to decoding a raw message body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The body data is not valid base64url.
    #[error("invalid base64 body data: {0}")]
    Base64(String),

    /// The decoded bytes are not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    Utf8(String),

    /// No body data was found in the payload.
    #[error("message has no body data")]
    MissingBody,
}

/// Errors related to processing rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Operator field names do not share one casing convention.
    #[error("custom rule keys must be uniformly title, lower, or upper case: {}", keys.join(", "))]
    MixedCasing { keys: Vec<String> },

    /// The rule names a type with no processor.
    #[error("invalid field type '{kind}' for field: {field}")]
    InvalidType { field: String, kind: String },

    /// A date rule without a layout.
    #[error("date format must be provided for date field: {field}")]
    MissingDateFormat { field: String },

    /// Neither an operator nor a built-in rule applies.
    #[error("no processing rule found for field: {field}")]
    NoRule { field: String },

    /// The rule entry is not an object of the expected shape.
    #[error("malformed rule for field {field}: {reason}")]
    Malformed { field: String, reason: String },
}

/// Errors raised by field processors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No recognized date layout matched the text.
    #[error("could not parse a date from: {input}")]
    UnparseableDate { input: String },

    /// The field's rule could not be resolved.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Result type for the spendmail library.
pub type Result<T> = std::result::Result<T, SpendmailError>;
