//! Common regex patterns for payment alert extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Signed numeral with optional decimals; commas may group digits any way
    // ("1,234.56", "1,23,456.00") but never end the token
    pub static ref NUMERAL: Regex = Regex::new(
        r"[-+]?\d(?:[\d,]*\d)?(?:\.\d+)?"
    ).unwrap();

    // Numeral following the word "amount" (currency symbols and labels in between)
    pub static ref AMOUNT_LABELED: Regex = Regex::new(
        r"(?i)amount\D{0,64}?([-+]?\d(?:[\d,]*\d)?(?:\.\d+)?)"
    ).unwrap();

    // Exactly one word token after "Note"
    pub static ref NOTE: Regex = Regex::new(
        r"(?i)\bnote\b:?\s+(\w+)"
    ).unwrap();

    // Leading "Date" label
    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\bdate\b:?\s*"
    ).unwrap();

    // Day glued to a whole month name ("8January", "08Mar")
    pub static ref DAY_MONTH_GLUED: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b"
    ).unwrap();

    pub static ref SPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // "2 March 2025 at 21:15:27"
    pub static ref DATE_DMY_AT: Regex = Regex::new(
        r"\b(\d{1,2}) ([A-Za-z]+) (\d{4}) at (\d{1,2}:\d{2}:\d{2})"
    ).unwrap();

    // "March 2, 2025 21:15:27"
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"\b([A-Za-z]+) (\d{1,2}), (\d{4}) (\d{1,2}:\d{2}:\d{2})"
    ).unwrap();

    // "2025-03-02 21:15:27"
    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})-(\d{2})-(\d{2})[ T](\d{2}:\d{2}:\d{2})"
    ).unwrap();

    // "02/03/2025 21:15:27"
    pub static ref DATE_DMY_SLASH: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})/(\d{4}) (\d{1,2}:\d{2}:\d{2})"
    ).unwrap();

    // "2 Mar 2025 at 21:15:27"
    pub static ref DATE_DMY_ABBR_AT: Regex = Regex::new(
        r"\b(\d{1,2}) ([A-Za-z]{3}) (\d{4}) at (\d{1,2}:\d{2}:\d{2})"
    ).unwrap();
}
