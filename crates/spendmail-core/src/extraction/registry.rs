//! Operator rule set and field namespace.

use std::collections::{BTreeMap, BTreeSet};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::casing::CaseConvention;
use super::rules::{Processor, RuleKind};
use crate::error::RuleError;

/// Field names extracted even without operator rules.
///
/// `default` is a rule type, not a field, and is deliberately absent.
pub const BUILTIN_FIELDS: [RuleKind; 3] = [RuleKind::Amount, RuleKind::Date, RuleKind::Note];

/// Operator-supplied rules keyed by field name.
///
/// Entries are checked when the set is built: each field holds either its
/// processor or the [`RuleError`] explaining why the rule is unusable. The
/// error surfaces when that field is resolved.
///
/// ```json
/// {
///     "Amount": {"type": "amount"},
///     "Note": {"type": "default"},
///     "Date": {"type": "date", "format": "%d %B %Y at %H:%M:%S"}
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct RuleSet {
    raw: BTreeMap<String, Value>,
    compiled: BTreeMap<String, Result<Processor, RuleError>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of rules.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a JSON object of rules, falling back to an empty set on
    /// malformed input.
    pub fn from_json_or_empty(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            warn!("Invalid JSON in field rules, using built-in rules only: {}", e);
            Self::new()
        })
    }

    /// Add or replace the rule for a field.
    pub fn with_rule(mut self, field: impl Into<String>, rule: Value) -> Self {
        self.insert(field.into(), rule);
        self
    }

    fn insert(&mut self, field: String, rule: Value) {
        let compiled = compile_rule(&field, &rule);
        self.compiled.insert(field.clone(), compiled);
        self.raw.insert(field, rule);
    }

    /// The compiled rule for a field, if the operator configured one.
    pub fn get(&self, field: &str) -> Option<&Result<Processor, RuleError>> {
        self.compiled.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.compiled.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.raw.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Casing convention shared by the operator's field names.
    pub fn case_convention(&self) -> CaseConvention {
        CaseConvention::classify(self.field_names())
    }

    /// All structural problems in the set, in field order.
    pub fn problems(&self) -> Vec<RuleError> {
        self.compiled
            .values()
            .filter_map(|r| r.as_ref().err().cloned())
            .collect()
    }

    /// Merge built-in and operator field names into one namespace.
    ///
    /// Built-in names take the operator's casing convention. With mixed
    /// casing, `strict` rejects the set; otherwise every name passes through
    /// unchanged.
    pub fn field_namespace(&self, strict: bool) -> Result<BTreeSet<String>, RuleError> {
        let convention = self.case_convention();

        if convention == CaseConvention::Mixed && strict {
            return Err(RuleError::MixedCasing {
                keys: self.field_names().map(str::to_string).collect(),
            });
        }

        let mut names: BTreeSet<String> = BUILTIN_FIELDS
            .iter()
            .map(|kind| convention.apply(kind.as_str()))
            .collect();
        names.extend(self.field_names().map(str::to_string));

        Ok(names)
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl From<BTreeMap<String, Value>> for RuleSet {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let mut set = Self::new();
        for (field, rule) in raw {
            set.insert(field, rule);
        }
        set
    }
}

impl From<RuleSet> for BTreeMap<String, Value> {
    fn from(set: RuleSet) -> Self {
        set.raw
    }
}

/// Validate one operator rule and build its processor.
fn compile_rule(field: &str, rule: &Value) -> Result<Processor, RuleError> {
    let Some(object) = rule.as_object() else {
        return Err(RuleError::Malformed {
            field: field.to_string(),
            reason: "rule must be a JSON object".to_string(),
        });
    };

    let kind_name = match object.get("type") {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(RuleError::Malformed {
                field: field.to_string(),
                reason: "'type' must be a string".to_string(),
            })
        }
    };

    let kind = RuleKind::from_name(kind_name).ok_or_else(|| RuleError::InvalidType {
        field: field.to_string(),
        kind: kind_name.to_lowercase(),
    })?;

    match kind {
        RuleKind::Amount => Ok(Processor::Amount),
        RuleKind::Note => Ok(Processor::Note),
        RuleKind::Default => Ok(Processor::Default),
        RuleKind::Date => {
            let format = object
                .get("format")
                .and_then(Value::as_str)
                .filter(|f| !f.trim().is_empty())
                .ok_or_else(|| RuleError::MissingDateFormat {
                    field: field.to_string(),
                })?;

            check_date_format(field, format)?;
            Ok(Processor::Date(format.to_string()))
        }
    }
}

/// Reject layouts chrono cannot interpret.
pub(crate) fn check_date_format(field: &str, format: &str) -> Result<(), RuleError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RuleError::Malformed {
            field: field.to_string(),
            reason: format!("unusable date format '{format}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(set: &[&str]) -> BTreeSet<String> {
        set.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_json() {
        let rules = RuleSet::from_json(
            r#"{
                "Amount": {"type": "amount"},
                "Note": {"type": "default"},
                "Date": {"type": "date", "format": "%d %B %Y at %H:%M:%S"}
            }"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules.get("Amount"), Some(&Ok(Processor::Amount)));
        assert_eq!(rules.get("Note"), Some(&Ok(Processor::Default)));
        assert_eq!(
            rules.get("Date"),
            Some(&Ok(Processor::Date("%d %B %Y at %H:%M:%S".into())))
        );
        assert!(rules.problems().is_empty());
    }

    #[test]
    fn test_from_json_or_empty() {
        assert!(RuleSet::from_json_or_empty("{not json").is_empty());
        assert!(RuleSet::from_json_or_empty("[1, 2]").is_empty());
        assert_eq!(RuleSet::from_json_or_empty(r#"{"Ref": {"type": "default"}}"#).len(), 1);
    }

    #[test]
    fn test_type_is_case_insensitive() {
        let rules = RuleSet::new().with_rule("Amount", json!({"type": "AMOUNT"}));
        assert_eq!(rules.get("Amount"), Some(&Ok(Processor::Amount)));
    }

    #[test]
    fn test_invalid_rules_are_kept_per_field() {
        let rules = RuleSet::new()
            .with_rule("Amount", json!({"type": "amount"}))
            .with_rule("Currency", json!({"type": "currency"}))
            .with_rule("Date", json!({"type": "date"}))
            .with_rule("Ref", json!("default"));

        assert_eq!(rules.get("Amount"), Some(&Ok(Processor::Amount)));
        assert_eq!(
            rules.problems(),
            vec![
                RuleError::InvalidType {
                    field: "Currency".into(),
                    kind: "currency".into()
                },
                RuleError::MissingDateFormat {
                    field: "Date".into()
                },
                RuleError::Malformed {
                    field: "Ref".into(),
                    reason: "rule must be a JSON object".into()
                },
            ]
        );
    }

    #[test]
    fn test_missing_type() {
        let rules = RuleSet::new().with_rule("Amount", json!({"format": "%Y"}));
        assert_eq!(
            rules.get("Amount"),
            Some(&Err(RuleError::InvalidType {
                field: "Amount".into(),
                kind: String::new()
            }))
        );
    }

    #[test]
    fn test_unusable_date_format() {
        let rules = RuleSet::new().with_rule("Date", json!({"type": "date", "format": "%Q"}));
        assert!(matches!(
            rules.get("Date"),
            Some(Err(RuleError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_namespace_empty_is_title() {
        let ns = RuleSet::new().field_namespace(true).unwrap();
        assert_eq!(ns, names(&["Amount", "Date", "Note"]));
    }

    #[test]
    fn test_namespace_follows_operator_casing() {
        let lower = RuleSet::new().with_rule("ref", json!({"type": "default"}));
        assert_eq!(
            lower.field_namespace(true).unwrap(),
            names(&["amount", "date", "note", "ref"])
        );

        let upper = RuleSet::new().with_rule("AMOUNT", json!({"type": "amount"}));
        assert_eq!(
            upper.field_namespace(true).unwrap(),
            names(&["AMOUNT", "DATE", "NOTE"])
        );

        let title = RuleSet::new().with_rule("Merchant Name", json!({"type": "default"}));
        assert_eq!(
            title.field_namespace(true).unwrap(),
            names(&["Amount", "Date", "Merchant Name", "Note"])
        );
    }

    #[test]
    fn test_namespace_mixed_casing() {
        let rules = RuleSet::new()
            .with_rule("Amount", json!({"type": "amount"}))
            .with_rule("note", json!({"type": "note"}));

        assert_eq!(
            rules.field_namespace(true),
            Err(RuleError::MixedCasing {
                keys: vec!["Amount".into(), "note".into()]
            })
        );

        assert_eq!(
            rules.field_namespace(false).unwrap(),
            names(&["Amount", "amount", "date", "note"])
        );
    }

    #[test]
    fn test_serialize_round_trips_raw_rules() {
        let json = r#"{"Date":{"format":"%Y-%m-%d","type":"date"}}"#;
        let rules = RuleSet::from_json(json).unwrap();
        assert_eq!(serde_json::to_string(&rules).unwrap(), json);
    }
}
