//! Resolution of field names to processors.

use super::registry::RuleSet;
use super::rules::{Processor, RuleKind, DEFAULT_DATE_FORMAT};
use crate::error::RuleError;

/// Chooses the processor for a field: operator rule first, then the
/// built-in rule named by the lowercased field name.
#[derive(Debug, Clone)]
pub struct RuleResolver {
    rules: RuleSet,
    default_date_format: String,
}

impl RuleResolver {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Layout bound to built-in date fields.
    pub fn with_default_date_format(mut self, format: impl Into<String>) -> Self {
        self.default_date_format = format.into();
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Determine the processor for a field.
    ///
    /// Fails when the operator rule is invalid or no rule applies at all.
    pub fn resolve(&self, field: &str) -> Result<Processor, RuleError> {
        if let Some(rule) = self.rules.get(field) {
            return rule.clone();
        }

        self.builtin(field).ok_or_else(|| RuleError::NoRule {
            field: field.to_string(),
        })
    }

    fn builtin(&self, field: &str) -> Option<Processor> {
        let name = field.to_lowercase();
        let kind = RuleKind::ALL.into_iter().find(|k| k.as_str() == name)?;

        Some(match kind {
            RuleKind::Amount => Processor::Amount,
            RuleKind::Date => Processor::Date(self.default_date_format.clone()),
            RuleKind::Note => Processor::Note,
            RuleKind::Default => Processor::Default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn custom_rules() -> RuleSet {
        RuleSet::from_json(
            r#"{
                "Amount": {"type": "amount"},
                "Note": {"type": "note"},
                "Date": {"type": "date", "format": "%Y/%m/%d %H:%M"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_determine_rule_custom_date() {
        let resolver = RuleResolver::new(custom_rules());
        assert_eq!(
            resolver.resolve("Date"),
            Ok(Processor::Date("%Y/%m/%d %H:%M".into()))
        );
        assert_eq!(resolver.resolve("Amount"), Ok(Processor::Amount));
    }

    #[test]
    fn test_determine_rule_builtin_fallback() {
        let resolver = RuleResolver::new(custom_rules());
        assert_eq!(
            resolver.resolve("date"),
            Ok(Processor::Date(DEFAULT_DATE_FORMAT.into()))
        );
        assert_eq!(resolver.resolve("note"), Ok(Processor::Note));
        assert_eq!(resolver.resolve("DEFAULT"), Ok(Processor::Default));
    }

    #[test]
    fn test_builtin_date_uses_configured_default() {
        let resolver = RuleResolver::new(RuleSet::new()).with_default_date_format("%d/%m/%Y");
        assert_eq!(resolver.resolve("Date"), Ok(Processor::Date("%d/%m/%Y".into())));
    }

    #[test]
    fn test_operator_rule_overrides_builtin_name() {
        let rules = RuleSet::new().with_rule("Amount", json!({"type": "default"}));
        let resolver = RuleResolver::new(rules);
        assert_eq!(resolver.resolve("Amount"), Ok(Processor::Default));
    }

    #[test]
    fn test_invalid_operator_rule_fails() {
        let rules = RuleSet::new()
            .with_rule("Date", json!({"type": "date"}))
            .with_rule("Fee", json!({"type": "money"}));
        let resolver = RuleResolver::new(rules);

        assert_eq!(
            resolver.resolve("Date"),
            Err(RuleError::MissingDateFormat {
                field: "Date".into()
            })
        );
        assert_eq!(
            resolver.resolve("Fee"),
            Err(RuleError::InvalidType {
                field: "Fee".into(),
                kind: "money".into()
            })
        );
    }

    #[test]
    fn test_no_rule() {
        let resolver = RuleResolver::new(RuleSet::new());
        assert_eq!(
            resolver.resolve("Merchant"),
            Err(RuleError::NoRule {
                field: "Merchant".into()
            })
        );
    }
}
