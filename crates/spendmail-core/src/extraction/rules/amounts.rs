//! Amount extraction for payment alerts.

use super::patterns::{AMOUNT_LABELED, NUMERAL};
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Prefers a numeral anchored after the word "amount" and falls back to the
/// first bare numeral in the text.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    fn labeled(&self, text: &str) -> Option<ExtractionMatch<f64>> {
        AMOUNT_LABELED.captures_iter(text).find_map(|caps| {
            let full_match = caps.get(0)?;
            let numeral = caps.get(1)?;
            let value = parse_amount(numeral.as_str())?;
            Some(
                ExtractionMatch::new(value, 0.95, full_match.as_str())
                    .with_position(numeral.start(), numeral.end()),
            )
        })
    }

    fn bare(&self, text: &str) -> Vec<ExtractionMatch<f64>> {
        NUMERAL
            .find_iter(text)
            .filter_map(|m| {
                parse_amount(m.as_str()).map(|value| {
                    ExtractionMatch::new(value, 0.5, m.as_str()).with_position(m.start(), m.end())
                })
            })
            .collect()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<f64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.labeled(text)
            .or_else(|| self.bare(text).into_iter().next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        let labeled = self.labeled(text);
        let labeled_position = labeled.as_ref().and_then(|m| m.position);
        results.extend(labeled);

        results.extend(
            self.bare(text)
                .into_iter()
                .filter(|m| m.position != labeled_position),
        );

        results
    }
}

/// Extract the transaction amount from alert text.
pub fn process_amount(text: &str) -> Option<f64> {
    AmountExtractor::new().extract(text).map(|m| m.value)
}

/// Parse a numeral token, stripping thousands separators (e.g. "1,234.56").
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
