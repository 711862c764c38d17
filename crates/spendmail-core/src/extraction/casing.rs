//! Casing convention of operator field names.
//!
//! Built-in field names are rewritten into the operator's convention so that
//! `amount` and `Amount` never coexist as distinct fields.

/// Casing shared by a set of field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConvention {
    /// Every word capitalized (`Amount`, `Transfer Note`).
    Title,
    /// No uppercase letters (`amount`).
    Lower,
    /// No lowercase letters (`AMOUNT`).
    Upper,
    /// Names disagree.
    Mixed,
}

impl CaseConvention {
    /// Classify a set of names. Title is checked first, then lower, then
    /// upper; an empty set is title case.
    pub fn classify<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let names = names.into_iter();

        if names.clone().all(is_title) {
            Self::Title
        } else if names.clone().all(is_lower) {
            Self::Lower
        } else if names.clone().all(is_upper) {
            Self::Upper
        } else {
            Self::Mixed
        }
    }

    /// Rewrite a name into this convention. `Mixed` leaves it unchanged.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Title => to_title(name),
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Mixed => name.to_string(),
        }
    }
}

/// Uppercase letters only start words, lowercase letters only continue
/// them, and at least one letter is present.
pub fn is_title(s: &str) -> bool {
    let mut previous_cased = false;
    let mut any_cased = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else {
            previous_cased = false;
        }
    }

    any_cased
}

/// At least one letter and none uppercase.
pub fn is_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

/// At least one letter and none lowercase.
pub fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Capitalize the first letter of every word and lowercase the rest.
pub fn to_title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_cased = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if previous_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_cased = true;
        } else {
            out.push(c);
            previous_cased = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(is_title("Amount"));
        assert!(is_title("Transfer Note"));
        assert!(is_title("A"));
        assert!(!is_title("amount"));
        assert!(!is_title("AMOUNT"));
        assert!(!is_title("McDonald"));
        assert!(!is_title("123"));

        assert!(is_lower("amount"));
        assert!(is_lower("ref_2"));
        assert!(!is_lower("Amount"));

        assert!(is_upper("AMOUNT"));
        assert!(!is_upper("Amount"));
        assert!(!is_upper("42"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(CaseConvention::classify(["Amount", "Date"]), CaseConvention::Title);
        assert_eq!(CaseConvention::classify(["amount", "note"]), CaseConvention::Lower);
        assert_eq!(CaseConvention::classify(["AMOUNT", "DATE"]), CaseConvention::Upper);
        assert_eq!(CaseConvention::classify(["Amount", "date"]), CaseConvention::Mixed);
        assert_eq!(CaseConvention::classify(Vec::<&str>::new()), CaseConvention::Title);
    }

    #[test]
    fn test_single_letter_prefers_title() {
        assert_eq!(CaseConvention::classify(["X"]), CaseConvention::Title);
    }

    #[test]
    fn test_apply() {
        assert_eq!(CaseConvention::Title.apply("note"), "Note");
        assert_eq!(CaseConvention::Title.apply("Amount"), "Amount");
        assert_eq!(CaseConvention::Lower.apply("Amount"), "amount");
        assert_eq!(CaseConvention::Upper.apply("date"), "DATE");
        assert_eq!(CaseConvention::Mixed.apply("date"), "date");
    }

    #[test]
    fn test_to_title() {
        assert_eq!(to_title("transfer note"), "Transfer Note");
        assert_eq!(to_title("RECEIVED_AT"), "Received_At");
    }
}
