//! Extracted field values and per-message extraction results.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Value produced by a field processor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Monetary amount.
    Amount(f64),
    /// Timestamp without zone, as written in the message.
    Date(NaiveDateTime),
    /// Free text (notes, default-typed fields).
    Text(String),
    /// The field could not be located or parsed.
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_amount(&self) -> Option<f64> {
        match self {
            Self::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Amount)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Self::Text(v) => f.write_str(v),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Field name to value mapping for one message.
///
/// Every field of the engine's namespace is present, with [`FieldValue::Null`]
/// marking the ones that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    fields: BTreeMap<String, FieldValue>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Value of a field by its exact name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Value of a field, matching the name case-insensitively.
    ///
    /// Callers that only know the semantic name (`amount`) use this so they
    /// work under any casing convention.
    pub fn get_ignore_case(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).or_else(|| {
            self.fields
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(field))
                .map(|(_, v)| v)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of fields that came back null.
    pub fn null_fields(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| v.is_null())
            .map(|(k, _)| k)
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
