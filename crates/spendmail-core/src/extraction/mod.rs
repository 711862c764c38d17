//! Rule-driven field extraction.

pub mod casing;
mod engine;
pub mod registry;
pub mod resolver;
pub mod rules;

pub use casing::CaseConvention;
pub use engine::ExtractionEngine;
pub use registry::{RuleSet, BUILTIN_FIELDS};
pub use resolver::RuleResolver;
pub use rules::{Processor, RuleKind};

use crate::decode::decode_body;
use crate::models::fields::ExtractionResult;
use crate::models::message::RawMessage;

/// Trait for message field extractors.
pub trait MessageExtractor {
    /// Extract fields from an already decoded body.
    fn extract_text(&self, body: &str) -> ExtractionResult;

    /// Decode a raw message and extract its fields.
    fn extract_message(&self, message: &RawMessage) -> ExtractionResult {
        self.extract_text(&decode_body(message))
    }
}
