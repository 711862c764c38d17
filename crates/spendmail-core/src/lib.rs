//! Core library for payment alert parsing.
//!
//! This crate provides:
//! - Message body decoding (base64url payload trees, markup flattening)
//! - Operator field rules with casing normalization and resolution
//! - Field processors for amounts, dates, and notes
//! - The extraction engine and a message-to-transaction pipeline
//!
//! ```
//! use spendmail_core::{ExtractionEngine, FieldValue, RuleSet};
//!
//! let engine = ExtractionEngine::with_rules(RuleSet::new()).unwrap();
//! let result = engine.extract("Amount 100.50 Date 6 January 2025 at 20:08:10");
//!
//! assert_eq!(result.get("Amount"), Some(&FieldValue::Amount(100.5)));
//! assert_eq!(result.get("Note"), Some(&FieldValue::Text("unknown".into())));
//! ```

pub mod decode;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;

pub use decode::{decode_body, encode_body, try_decode_body};
pub use error::{DecodeError, ExtractionError, Result, RuleError, SpendmailError};
pub use extraction::{
    CaseConvention, ExtractionEngine, MessageExtractor, Processor, RuleKind, RuleResolver,
    RuleSet,
};
pub use models::config::EngineConfig;
pub use models::fields::{ExtractionResult, FieldValue};
pub use models::message::{MessagePart, PartBody, RawMessage};
pub use models::transaction::Transaction;
pub use pipeline::{process_message, process_messages, BatchReport, MessageSource, TransactionStore};
