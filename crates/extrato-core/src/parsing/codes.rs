//! ISRC (recording) and ISWC (musical work) code detection.
//!
//! Statements print codes either behind an explicit `ISRC` label, bare in
//! the middle of a data line, or on a line of their own next to the data
//! they belong to.

use regex::Regex;
use std::sync::LazyLock;

/// Bare ISRC, e.g. "BR-WNV-17-00176" (dashes optional).
static ISRC_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2}-?[\w]{3}-?\d{2}-?\d{5})\b").unwrap());
/// Labelled ISRC, e.g. "ISRC BR-WNV-17-00176".
static ISRC_LABELLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ISRC\s+([A-Z]{2}[\w-]+)").unwrap());
static ISRC_LABELLED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ISRC\s+[A-Z]{2}[\w-]+").unwrap());
/// ISWC, e.g. "T-323.947.319-5".
static ISWC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(T-?\d{3,}\.?\d{3,}\.?\d{3,}-?\d)\b").unwrap());

/// Window used when a data line carries no code of its own.
pub const DEFAULT_CODE_WINDOW: usize = 2;

/// Extract an ISRC from a line. A labelled code wins over a bare one.
pub fn extract_isrc(line: &str) -> Option<String> {
    if line.is_empty() {
        return None;
    }

    ISRC_LABELLED
        .captures(line)
        .or_else(|| ISRC_BARE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Extract an ISWC from a line.
pub fn extract_iswc(line: &str) -> Option<String> {
    ISWC.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Remove a labelled ISRC token ("ISRC XX...") from a line and trim it.
///
/// Used to decide whether a line carried anything besides its code.
pub fn strip_isrc_label(line: &str) -> String {
    ISRC_LABELLED_TOKEN.replace_all(line, "").trim().to_string()
}

/// Look for an ISRC on the lines around `index`, `window` lines either side,
/// scanning top to bottom and skipping `index` itself. The first code found
/// wins, even if it sits above the line and may belong to the previous
/// recording.
pub fn isrc_from_window<S: AsRef<str>>(lines: &[S], index: usize, window: usize) -> Option<String> {
    let start = index.saturating_sub(window);
    let end = lines.len().min(index.saturating_add(window).saturating_add(1));

    (start..end)
        .filter(|&i| i != index)
        .find_map(|i| extract_isrc(lines[i].as_ref()))
}
