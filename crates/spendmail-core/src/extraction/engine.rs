//! Extraction orchestrator.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::registry::RuleSet;
use super::resolver::RuleResolver;
use super::rules::Processor;
use super::MessageExtractor;
use crate::decode::flatten_text;
use crate::error::{ExtractionError, RuleError};
use crate::models::config::EngineConfig;
use crate::models::fields::{ExtractionResult, FieldValue};

/// Rule-driven field extraction over flattened message text.
///
/// The field namespace and rules are fixed at construction, so one engine
/// can be shared across threads and messages.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    resolver: RuleResolver,
    namespace: BTreeSet<String>,
    strip_html: bool,
}

impl ExtractionEngine {
    /// Build an engine from configuration.
    ///
    /// Fails when strict casing is on and the operator field names mix
    /// conventions, or when the default date format is unusable. Individual
    /// invalid rules do not fail construction; those fields extract as null.
    pub fn new(config: EngineConfig) -> Result<Self, RuleError> {
        super::registry::check_date_format("default_date_format", &config.default_date_format)?;

        let namespace = config.rules.field_namespace(config.strict_casing)?;

        for problem in config.rules.problems() {
            warn!("Invalid field rule: {}", problem);
        }

        debug!("Field namespace: {:?}", namespace);

        let resolver =
            RuleResolver::new(config.rules).with_default_date_format(config.default_date_format);

        Ok(Self {
            resolver,
            namespace,
            strip_html: config.strip_html,
        })
    }

    /// Build an engine with default settings and the given rules.
    pub fn with_rules(rules: RuleSet) -> Result<Self, RuleError> {
        Self::new(EngineConfig::default().with_rules(rules))
    }

    /// Field names extracted on every pass.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.namespace.iter().map(String::as_str)
    }

    pub fn rules(&self) -> &RuleSet {
        self.resolver.rules()
    }

    /// Determine the processor for a field.
    pub fn resolve(&self, field: &str) -> Result<Processor, RuleError> {
        self.resolver.resolve(field)
    }

    /// Resolve and run the processor for one field.
    pub fn process_field(&self, field: &str, text: &str) -> Result<FieldValue, ExtractionError> {
        self.resolve(field)?.apply(text)
    }

    /// Extract every namespace field from a decoded body.
    ///
    /// Never fails as a whole: a field whose rule or value cannot be
    /// processed is recorded as [`FieldValue::Null`].
    pub fn extract(&self, body: &str) -> ExtractionResult {
        let start = Instant::now();
        let text = flatten_text(body, self.strip_html);

        info!(
            "Extracting {} fields from {} characters of text",
            self.namespace.len(),
            text.len()
        );

        let mut result = ExtractionResult::new();

        for field in &self.namespace {
            let value = match self.process_field(field, &text) {
                Ok(value) => value,
                Err(ExtractionError::Rule(e)) => {
                    warn!("Data processor error for {}: {}", field, e);
                    FieldValue::Null
                }
                Err(e) => {
                    info!("Data processor error for {}: {}", field, e);
                    FieldValue::Null
                }
            };
            result.insert(field.clone(), value);
        }

        debug!(
            "Extracted {} fields ({} null) in {:?}",
            result.len(),
            result.null_fields().len(),
            start.elapsed()
        );

        result
    }
}

impl MessageExtractor for ExtractionEngine {
    fn extract_text(&self, body: &str) -> ExtractionResult {
        self.extract(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> FieldValue {
        FieldValue::Date(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
        )
    }

    fn custom_engine() -> ExtractionEngine {
        ExtractionEngine::with_rules(
            RuleSet::from_json(
                r#"{
                    "Amount": {"type": "amount"},
                    "Note": {"type": "note"},
                    "Date": {"type": "date", "format": "%d %B %Y at %H:%M:%S"}
                }"#,
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_extract_default_rules() {
        let engine = ExtractionEngine::with_rules(RuleSet::new()).unwrap();
        let body = "Dear customer, Amount 100.50 was debited. Date 6 January 2025 at 20:08:10. Thank you.";

        let result = engine.extract(body);

        let expected: ExtractionResult = [
            ("Amount".to_string(), FieldValue::Amount(100.5)),
            ("Date".to_string(), date(2025, 1, 6, 20, 8, 10)),
            ("Note".to_string(), FieldValue::Text("unknown".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_extract_with_note() {
        let body = "Funds transfer Amount MYR 1,250.00 Date 2 March 2025 at 21:15:27 \
                    Note Groceries Bank Reference No. 524071";

        let result = custom_engine().extract(body);

        assert_eq!(result.get("Amount"), Some(&FieldValue::Amount(1250.0)));
        assert_eq!(result.get("Date"), Some(&date(2025, 3, 2, 21, 15, 27)));
        assert_eq!(result.get("Note"), Some(&FieldValue::Text("groceries".into())));
    }

    #[test]
    fn test_extract_html_body() {
        let html = r#"
            <html><body><table>
                <tr><td>Amount</td><td>100.50</td></tr>
                <tr><td>Date</td><td>10.3K</td></tr>
            </table></body></html>
        "#;

        let result = custom_engine().extract(html);

        assert_eq!(result.get("Amount"), Some(&FieldValue::Amount(100.5)));
        assert_eq!(result.get("Date"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_invalid_rule_downgrades_to_null() {
        let rules = RuleSet::new()
            .with_rule("Amount", json!({"type": "amount"}))
            .with_rule("Fee", json!({"type": "money"}))
            .with_rule("Date", json!({"type": "date"}));
        let engine = ExtractionEngine::with_rules(rules).unwrap();

        let result = engine.extract("Amount 5.00 Date 2 March 2025 at 21:15:27");

        assert_eq!(result.len(), 4);
        assert_eq!(result.get("Amount"), Some(&FieldValue::Amount(5.0)));
        assert_eq!(result.get("Fee"), Some(&FieldValue::Null));
        assert_eq!(result.get("Date"), Some(&FieldValue::Null));
        assert_eq!(result.get("Note"), Some(&FieldValue::Text("unknown".into())));
    }

    #[test]
    fn test_mixed_casing_policies() {
        let rules = RuleSet::new()
            .with_rule("Amount", json!({"type": "amount"}))
            .with_rule("note", json!({"type": "note"}));

        let strict = ExtractionEngine::new(EngineConfig::default().with_rules(rules.clone()));
        assert!(matches!(strict, Err(RuleError::MixedCasing { .. })));

        let lenient = ExtractionEngine::new(
            EngineConfig::default()
                .with_rules(rules)
                .with_strict_casing(false),
        )
        .unwrap();
        let names: Vec<&str> = lenient.field_names().collect();
        assert_eq!(names, vec!["Amount", "amount", "date", "note"]);
    }

    #[test]
    fn test_unusable_default_date_format() {
        let config = EngineConfig {
            default_date_format: "%Q".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            ExtractionEngine::new(config),
            Err(RuleError::Malformed { .. })
        ));
    }

    #[test]
    fn test_process_field_surfaces_errors() {
        let engine = custom_engine();
        assert_eq!(
            engine.process_field("Merchant", "anything"),
            Err(ExtractionError::Rule(RuleError::NoRule {
                field: "Merchant".into()
            }))
        );
        assert!(matches!(
            engine.process_field("Date", "no date"),
            Err(ExtractionError::UnparseableDate { .. })
        ));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let engine = custom_engine();
        let body = "Amount 12.00 Note Lunch Date March 2, 2025 21:15:27";
        assert_eq!(engine.extract(body), engine.extract(body));
    }

    #[test]
    fn test_empty_body() {
        let result = custom_engine().extract("");
        assert_eq!(result.get("Amount"), Some(&FieldValue::Null));
        assert_eq!(result.get("Date"), Some(&FieldValue::Null));
        assert_eq!(result.get("Note"), Some(&FieldValue::Text("unknown".into())));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractionEngine>();
    }
}
