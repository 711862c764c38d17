//! Flattening of decoded bodies to single-line plain text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<(?:[a-zA-Z][a-zA-Z0-9]*|/[a-zA-Z]|!)[^>]*>").unwrap();
    static ref NUMERIC_ENTITY: Regex = Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap();
}

const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// Flatten a decoded body: optionally strip markup, then collapse all
/// whitespace runs to single spaces.
pub fn flatten_text(body: &str, strip_markup: bool) -> String {
    if strip_markup && looks_like_html(body) {
        collapse_whitespace(&strip_html(body))
    } else {
        collapse_whitespace(body)
    }
}

/// Whether the text contains at least one markup tag.
pub fn looks_like_html(text: &str) -> bool {
    HTML_TAG.is_match(text)
}

/// Join whitespace-separated tokens with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove tags, script and style contents, and decode entities.
///
/// Every tag becomes a space so adjacent cells (`<td>Amount</td><td>5</td>`)
/// stay separate words.
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        result.push_str(&rest[..open]);

        let tail = &rest[open..];
        let Some(close) = tail.find('>') else {
            result.push_str(tail);
            rest = "";
            break;
        };

        let tag = tail[1..close].trim().to_ascii_lowercase();
        rest = &tail[close + 1..];

        match RAW_TEXT_TAGS.iter().find(|name| tag.starts_with(**name)) {
            Some(name) => rest = skip_raw_text(rest, name),
            None => result.push(' '),
        }
    }

    result.push_str(rest);

    decode_entities(&result)
}

// Script and style bodies may contain `<` freely; only the closing tag ends them.
fn skip_raw_text<'a>(text: &'a str, name: &str) -> &'a str {
    let closing = format!("</{name}");
    let Some(start) = text.to_ascii_lowercase().find(&closing) else {
        return "";
    };

    let after = &text[start..];
    after.find('>').map_or("", |end| &after[end + 1..])
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&pound;", "\u{a3}")
        .replace("&euro;", "\u{20ac}")
        .replace("&yen;", "\u{a5}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_table() {
        let html = r#"
            <html>
            <body>
                <table>
                    <tr><td>Amount</td><td>100.50</td></tr>
                </table>
            </body>
            </html>
        "#;
        assert_eq!(flatten_text(html, true), "Amount 100.50");
    }

    #[test]
    fn test_adjacent_cells_stay_separate() {
        assert_eq!(
            flatten_text("<td>Note</td><td>Groceries</td>", true),
            "Note Groceries"
        );
    }

    #[test]
    fn test_script_and_style_dropped() {
        let html = "<style>p { color: red }</style><p>Paid&nbsp;5&amp;6</p><script>var x = 1 < 2;</script>";
        assert_eq!(flatten_text(html, true), "Paid 5&6");
    }

    #[test]
    fn test_script_with_less_than_keeps_following_content() {
        let html = "<script>if (a < b) {}</script><p>Amount 5.00</p>";
        assert_eq!(flatten_text(html, true), "Amount 5.00");

        let html = "<SCRIPT>x<y</SCRIPT ><style>a<b{}</style>Date 2 March 2025";
        assert_eq!(flatten_text(html, true), "Date 2 March 2025");
    }

    #[test]
    fn test_unterminated_script_drops_rest() {
        assert_eq!(flatten_text("<p>Amount 5</p><script>var a = 1;", true), "Amount 5");
    }

    #[test]
    fn test_numeric_entities_decoded() {
        assert_eq!(
            flatten_text("<p>Amount &#36;1,234.56 &#x20B9;9 &#2547;7&#160;ok</p>", true),
            "Amount $1,234.56 \u{20b9}9 \u{09f3}7 ok"
        );
        assert_eq!(flatten_text("<b>&amp;#36;</b>", true), "&#36;");
        assert_eq!(flatten_text("<b>x&#1114112;y</b>", true), "xy");
    }

    #[test]
    fn test_plain_text_untouched_except_spacing() {
        assert_eq!(flatten_text("  Amount\n\t 5 < 6 ", true), "Amount 5 < 6");
        assert_eq!(flatten_text("<b>x</b>", false), "<b>x</b>");
    }

    #[test]
    fn test_unclosed_tag_kept() {
        assert_eq!(strip_html("<p>a</p> b <c"), " a  b <c");
    }
}
