//! Response sanitization applied before any record extraction.
//!
//! Grounded generation tends to append a "sources" tail and to sprinkle
//! citation markers through the prose. Everything from the first source
//! header onwards is cut, URL-like tokens and `[1]`/`[1, 2]` markers are
//! stripped, and trailing bullet debris is trimmed.

use regex::Regex;
use std::sync::LazyLock;

/// Headers that introduce a grounding-source tail. The cut happens at the
/// leftmost occurrence of any of them, case-insensitively.
static SOURCE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Sources Found:|Sources:|Grounding Sources:|Relevant links:")
        .expect("source header pattern")
});

/// URL-like tokens: explicit schemes and bare www hosts.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").expect("url pattern"));

/// Numeric citation markers like `[1]` or `[1, 2]`.
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+(?:,\s*\d+)*\]").expect("citation pattern"));

/// Bullet/punctuation debris left dangling at the end of the text.
static TRAILING_DEBRIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{2022}\-*]+$").expect("trailing debris pattern"));

/// Cleans a raw AI response for extraction.
///
/// Record brackets that precede a removed tail survive untouched.
pub fn sanitize_response(raw: &str) -> String {
    let mut text = match SOURCE_HEADER_RE.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    }
    .to_string();

    text = URL_RE.replace_all(&text, "").into_owned();
    text = CITATION_RE.replace_all(&text, "").into_owned();
    text = TRAILING_DEBRIS_RE.replace_all(&text, "").into_owned();

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_text_at_first_source_header() {
        let raw = "markets are up today. Sources: http://example.com and more";
        assert_eq!(sanitize_response(raw), "markets are up today.");
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let raw = "data here GROUNDING SOURCES: a, b, c";
        assert_eq!(sanitize_response(raw), "data here");
    }

    #[test]
    fn strips_urls_and_citations_inline() {
        let raw = "NIFTY closed higher [1, 2] per https://news.example.com today";
        assert_eq!(sanitize_response(raw), "NIFTY closed higher  per  today");
    }

    #[test]
    fn strips_bare_www_tokens() {
        let raw = "see www.nseindia.com for details";
        assert_eq!(sanitize_response(raw), "see  for details");
    }

    #[test]
    fn trims_trailing_bullets_and_dashes() {
        let raw = "headline one\n- headline two\n- * \u{2022} ";
        assert_eq!(sanitize_response(raw), "headline one\n- headline two");
    }

    #[test]
    fn keeps_record_brackets_before_removed_tail() {
        let raw = "noise [NAME: NIFTY 50 | PRICE: 100.5 | CHANGE: 1.2 | PERCENT: 0.5] more noise Sources: http://x.com";
        let clean = sanitize_response(raw);
        assert!(clean.contains("[NAME: NIFTY 50 | PRICE: 100.5 | CHANGE: 1.2 | PERCENT: 0.5]"));
        assert!(!clean.contains("Sources:"));
    }
}
