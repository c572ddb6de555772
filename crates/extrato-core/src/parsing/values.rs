use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d.,\-]").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Parse a Brazilian-formatted amount into a Decimal.
///
/// Handles formats like:
/// - "1.234,56" -> 1234.56 (dot thousands, comma decimal)
/// - "0,00" -> 0.00
/// - "1234.56" -> 1234.56 (already normalized)
/// - "R$ 10,00" -> 10.00 (non-numeric characters are dropped)
/// - "---", "-", "", "None" -> None (null, not zero)
///
/// Anything that still fails to parse is also None, including amounts
/// beyond `Decimal`'s range; a bad cell never aborts the row.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();

    if matches!(s, "---" | "-" | "" | "None") {
        return None;
    }

    let mut numeric = NON_NUMERIC.replace_all(s, "").into_owned();
    if numeric.is_empty() {
        return None;
    }

    if numeric.contains(',') {
        if numeric.contains('.') {
            numeric = numeric.replace('.', "").replace(',', ".");
        } else {
            numeric = numeric.replace(',', ".");
        }
    }

    Decimal::from_str(&numeric).ok()
}

/// Collapse whitespace runs to a single space and trim. Empty input is None.
pub fn clean_text(s: &str) -> Option<String> {
    let collapsed = WHITESPACE_RUN.replace_all(s, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
