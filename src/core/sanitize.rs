// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;

/// One or more footnote markers at the end of a string:
/// `[5]`, `[a]`, `[note 2]`, `*`, `†`, `‡`, with optional spacing between them.
static TRAILING_FOOTNOTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*(?:\[[^\[\]]{0,40}\]|[*†‡]))+\s*$").expect("static regex")
});

/// Inline citation markers inside running text.
static CITATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(?:\d+|[a-zA-Z]{1,2}|(?:note|nb|n)\s*\d+|citation needed|clarification needed|when\?|who\?)\s*\]")
        .expect("static regex")
});

/// Collapse sequences of whitespace (incl. NBSP) into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop trailing footnote markers: `"1,234,567[5]"` → `"1,234,567"`.
pub fn strip_trailing_footnotes(s: &str) -> &str {
    match TRAILING_FOOTNOTES.find(s) {
        Some(m) => s[..m.start()].trim_end(),
        None => s.trim_end(),
    }
}

/// Remove citation markers from running text and tidy the gaps they leave.
pub fn strip_citations(s: &str) -> String {
    let cleaned = CITATIONS.replace_all(s, "");
    normalize_ws(&cleaned)
        .replace(" ,", ",")
        .replace(" .", ".")
}

/// Canonical form for matching labels and headers: footnotes and leading
/// bullets gone, whitespace collapsed, lowercase.
pub fn clean_label(s: &str) -> String {
    let s = normalize_ws(s);
    let s = s.trim_start_matches(['•', '·', '-', '–']).trim();
    strip_trailing_footnotes(s).to_lowercase()
}

/// Sanitize a country name lifted from a table cell: anything from the
/// first `[` on is footnote noise (`"France[f]"` → `"France"`).
pub fn clean_country_name(s: &str) -> String {
    let s = normalize_ws(s);
    let head = s.split('[').next().unwrap_or("");
    strip_trailing_footnotes(head).trim().to_string()
}

/// Case- and whitespace-insensitive key for name lookups.
pub fn name_key(s: &str) -> String {
    clean_country_name(s).to_lowercase()
}
