//! Configuration structures for the extraction engine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::extraction::registry::RuleSet;
use crate::extraction::rules::DEFAULT_DATE_FORMAT;

/// Environment variable holding the operator rule set as JSON.
pub const RULES_ENV: &str = "ET_EMAIL_FIELD_RULES";

/// Environment variable selecting the mixed-casing policy.
pub const STRICT_CASING_ENV: &str = "ET_STRICT_CASING";

/// Extraction engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Operator field rules.
    pub rules: RuleSet,

    /// Reject operator rules whose field names mix casing conventions.
    /// When false, names pass through unchanged.
    pub strict_casing: bool,

    /// Layout bound to built-in date fields.
    pub default_date_format: String,

    /// Strip HTML markup from bodies before extraction.
    pub strip_html: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::new(),
            strict_casing: true,
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
            strip_html: true,
        }
    }
}

impl EngineConfig {
    /// Set the operator rules.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set the mixed-casing policy.
    pub fn with_strict_casing(mut self, strict: bool) -> Self {
        self.strict_casing = strict;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// Malformed rule JSON leaves the rule set empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(RULES_ENV) {
            config.rules = RuleSet::from_json_or_empty(&raw);
        }

        if let Some(raw) = lookup(STRICT_CASING_ENV) {
            match parse_flag(&raw) {
                Some(strict) => config.strict_casing = strict,
                None => warn!(
                    "Ignoring {}={:?}, expected true or false",
                    STRICT_CASING_ENV, raw
                ),
            }
        }

        config
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
