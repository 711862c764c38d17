//! Date extraction for payment alerts.

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use super::patterns::{
    DATE_DMY_ABBR_AT, DATE_DMY_AT, DATE_DMY_SLASH, DATE_ISO, DATE_LABEL, DATE_MONTH_FIRST,
    DAY_MONTH_GLUED, SPACE_RUN,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;

/// Layout bound to built-in date fields.
pub const DEFAULT_DATE_FORMAT: &str = "%d %B %Y at %H:%M:%S";

/// Recognized date layouts, tried in this order when no explicit layout matches.
pub const FALLBACK_CHAIN: [DateLayout; 5] = [
    DateLayout::DayMonthYearAt,
    DateLayout::MonthDayYear,
    DateLayout::Iso,
    DateLayout::DayMonthYearSlash,
    DateLayout::DayAbbrevMonthYearAt,
];

/// A date layout paired with the pattern that finds it in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `2 March 2025 at 21:15:27`
    DayMonthYearAt,
    /// `March 2, 2025 21:15:27`
    MonthDayYear,
    /// `2025-03-02 21:15:27`
    Iso,
    /// `02/03/2025 21:15:27`
    DayMonthYearSlash,
    /// `2 Mar 2025 at 21:15:27`
    DayAbbrevMonthYearAt,
}

impl DateLayout {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::DayMonthYearAt => &DATE_DMY_AT,
            Self::MonthDayYear => &DATE_MONTH_FIRST,
            Self::Iso => &DATE_ISO,
            Self::DayMonthYearSlash => &DATE_DMY_SLASH,
            Self::DayAbbrevMonthYearAt => &DATE_DMY_ABBR_AT,
        }
    }

    /// chrono format for the substring rebuilt by [`Self::candidate`].
    pub fn format(self) -> &'static str {
        match self {
            Self::DayMonthYearAt => "%d %B %Y %H:%M:%S",
            Self::MonthDayYear => "%B %d, %Y %H:%M:%S",
            Self::Iso => "%Y-%m-%d %H:%M:%S",
            Self::DayMonthYearSlash => "%d/%m/%Y %H:%M:%S",
            Self::DayAbbrevMonthYearAt => "%d %b %Y %H:%M:%S",
        }
    }

    // Minimal date/time substring, without the "at" connective.
    fn candidate(self, caps: &Captures<'_>) -> String {
        let (a, b, c, time) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        match self {
            Self::DayMonthYearAt | Self::DayAbbrevMonthYearAt => format!("{a} {b} {c} {time}"),
            Self::MonthDayYear => format!("{a} {b}, {c} {time}"),
            Self::Iso => format!("{a}-{b}-{c} {time}"),
            Self::DayMonthYearSlash => format!("{a}/{b}/{c} {time}"),
        }
    }

    fn parse(self, caps: &Captures<'_>) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.candidate(caps), self.format()).ok()
    }
}

/// Date field extractor running the fallback chain.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn matches(
        layout: DateLayout,
        text: &str,
    ) -> impl Iterator<Item = ExtractionMatch<NaiveDateTime>> + '_ {
        layout.pattern().captures_iter(text).filter_map(move |caps| {
            let value = layout.parse(&caps)?;
            let full_match = caps.get(0)?;
            Some(
                ExtractionMatch::new(value, 0.9, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDateTime>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        FALLBACK_CHAIN
            .into_iter()
            .find_map(|layout| Self::matches(layout, text).next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        FALLBACK_CHAIN
            .into_iter()
            .flat_map(|layout| Self::matches(layout, text))
            .collect()
    }
}

/// Extract the transaction timestamp from alert text.
///
/// With a layout, the text (or the remainder after a `Date` label) is parsed
/// against it first; on failure the fallback chain runs. Fails when no
/// layout yields a valid timestamp.
pub fn process_date(text: &str, layout: Option<&str>) -> Result<NaiveDateTime, ExtractionError> {
    let normalized = normalize_date_text(text);

    layout
        .and_then(|layout| parse_with_layout(&normalized, layout))
        .or_else(|| DateExtractor::new().extract(&normalized).map(|m| m.value))
        .ok_or_else(|| ExtractionError::UnparseableDate {
            input: normalized.chars().take(64).collect(),
        })
}

/// Collapse noisy spacing: non-breaking spaces, whitespace runs, and day
/// numbers glued to month names ("8January" becomes "8 January").
pub fn normalize_date_text(text: &str) -> String {
    let separated = DAY_MONTH_GLUED.replace_all(text, "${1} ${2}");
    SPACE_RUN.replace_all(&separated, " ").trim().to_string()
}

fn parse_with_layout(text: &str, layout: &str) -> Option<NaiveDateTime> {
    let after_labels = DATE_LABEL.find_iter(text).map(|m| &text[m.end()..]);

    std::iter::once(text)
        .chain(after_labels)
        .find_map(|candidate| parse_prefix(candidate, layout))
}

// Date-only layouts resolve to midnight.
fn parse_prefix(text: &str, layout: &str) -> Option<NaiveDateTime> {
    if let Ok((datetime, _)) = NaiveDateTime::parse_and_remainder(text, layout) {
        return Some(datetime);
    }

    NaiveDate::parse_and_remainder(text, layout)
        .ok()
        .and_then(|(date, _)| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_default_layout() {
        let result = process_date("2 March 2025 at 21:15:27", Some(DEFAULT_DATE_FORMAT));
        assert_eq!(result, Ok(datetime(2025, 3, 2, 21, 15, 27)));
    }

    #[test]
    fn test_fallback_layouts_agree() {
        let expected = datetime(2025, 3, 2, 21, 15, 27);
        let inputs = [
            "2 March 2025 at 21:15:27",
            "March 2, 2025 21:15:27",
            "2025-03-02 21:15:27",
            "02/03/2025 21:15:27",
            "2 Mar 2025 at 21:15:27",
        ];

        for input in inputs {
            assert_eq!(process_date(input, None), Ok(expected), "input: {input}");
            assert_eq!(
                process_date(input, Some(DEFAULT_DATE_FORMAT)),
                Ok(expected),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_labeled_date_in_body() {
        let text = "Dear customer, Amount 100.50 Date 6 January 2025 at 20:08:10 Bank Reference No. 1";
        assert_eq!(
            process_date(text, Some(DEFAULT_DATE_FORMAT)),
            Ok(datetime(2025, 1, 6, 20, 8, 10))
        );
    }

    #[test]
    fn test_custom_layout_after_label() {
        let text = "Payment received. Date: 2025/03/02 21:15 Ref 99";
        assert_eq!(
            process_date(text, Some("%Y/%m/%d %H:%M")),
            Ok(datetime(2025, 3, 2, 21, 15, 0))
        );
    }

    #[test]
    fn test_date_only_layout_is_midnight() {
        assert_eq!(
            process_date("Date 15.01.2025", Some("%d.%m.%Y")),
            Ok(datetime(2025, 1, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_noisy_spacing() {
        assert_eq!(
            process_date("Date 8January  2025\u{a0}at 09:05:00", None),
            Ok(datetime(2025, 1, 8, 9, 5, 0))
        );
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        let text = "Sent 31 February 2025 at 10:00:00, posted 1 March 2025 at 10:00:00";
        assert_eq!(process_date(text, None), Ok(datetime(2025, 3, 1, 10, 0, 0)));
    }

    #[test]
    fn test_unrecognized_layout() {
        let err = process_date("Invalid Date", Some(DEFAULT_DATE_FORMAT)).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::UnparseableDate {
                input: "Invalid Date".to_string()
            }
        );

        assert!(process_date("Date 10.3K", None).is_err());
    }

    #[test]
    fn test_normalize_date_text() {
        assert_eq!(
            normalize_date_text("  8January\u{a0}\u{a0}2025 "),
            "8 January 2025"
        );
        assert_eq!(normalize_date_text("10 Mar"), "10 Mar");
        assert_eq!(normalize_date_text("Paid 08Mar 2025"), "Paid 08 Mar 2025");
    }

    #[test]
    fn test_normalize_leaves_codes_alone() {
        assert_eq!(normalize_date_text("Scored 4Marks"), "Scored 4Marks");
        assert_eq!(normalize_date_text("Ref A7DEC9 ok"), "Ref A7DEC9 ok");
        assert_eq!(normalize_date_text("Txn 2025may1"), "Txn 2025may1");
    }

    #[test]
    fn test_extract_all_in_chain_order() {
        let extractor = DateExtractor::new();
        let text = "2025-01-02 10:00:00 then 3 January 2025 at 11:00:00";
        let results = extractor.extract_all(text);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, datetime(2025, 1, 3, 11, 0, 0));
        assert_eq!(results[1].value, datetime(2025, 1, 2, 10, 0, 0));
    }
}
