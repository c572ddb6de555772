use regex::Regex;
use std::sync::LazyLock;

static RANGE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+A\s+").unwrap());

/// Normalize a statement period: "06/2024 A 08/2024" -> "06/2024 - 08/2024".
/// A single "MM/YYYY" passes through unchanged.
pub fn format_period(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Some(RANGE_SEPARATOR.replace_all(s, " - ").into_owned())
}

/// Split a formatted period into (start, end). A single month yields the
/// same value on both ends so every record can be range-filtered.
pub fn split_period(s: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return (None, None);
    };

    let parts: Vec<&str> = s.split(" - ").collect();
    if let [start, end] = parts.as_slice() {
        return (Some(start.trim().to_string()), Some(end.trim().to_string()));
    }

    let single = s.trim().to_string();
    (Some(single.clone()), Some(single))
}
