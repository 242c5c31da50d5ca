//! Evidence formatting: whitespace normalization, keyword highlighting and
//! length-budget truncation.
//!
//! Highlighting wraps matched terms in square brackets. All terms are
//! combined into a single longest-first alternation and applied in one pass,
//! so overlapping terms ("spring" inside "spring boot") are wrapped exactly
//! once and stripping the markers always reproduces the normalized text.

use regex::Regex;

/// Appended when formatted text exceeds the length budget.
pub const TRUNCATION_MARKER: &str = "...";

/// Collapse all whitespace runs to a single space and trim the ends.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap each keyword occurrence in `[...]`, case-insensitively, at word
/// boundaries. Longer keywords take precedence over shorter ones that they
/// contain. Returns the text unchanged when `keywords` is empty.
pub fn highlight(text: &str, keywords: &[String]) -> String {
    let mut terms: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !k.trim().is_empty())
        .collect();
    if terms.is_empty() {
        return text.to_string();
    }
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    terms.dedup();

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)\b(?:{})\b", alternation);
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, "[${0}]").into_owned(),
        // A keyword set that fails to compile leaves the text unhighlighted.
        Err(_) => text.to_string(),
    }
}

/// Cut `text` to at most `max_len` characters, appending a truncation
/// marker when anything was removed. Operates on characters, not bytes, so
/// Cyrillic text is never split inside a UTF-8 sequence.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_len).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// Produce display-ready evidence text: normalize whitespace, optionally
/// highlight the query keywords, then truncate to the length budget.
/// Truncation happens after highlighting, so a marker may be cut off at the
/// boundary; that is cosmetic, not a correctness concern.
pub fn format_evidence(
    text: &str,
    keywords: &[String],
    max_len: usize,
    do_highlight: bool,
) -> String {
    let normalized = normalize_ws(text);
    let highlighted = if do_highlight {
        highlight(&normalized, keywords)
    } else {
        normalized
    };
    truncate(&highlighted, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  a\t\tb\n\nc  "), "a b c");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn test_highlight_case_insensitive_word_boundary() {
        let out = highlight("Python developer, not pythonic", &kw(&["python"]));
        assert_eq!(out, "[Python] developer, not pythonic");
    }

    #[test]
    fn test_highlight_longer_term_wins() {
        let out = highlight("Spring Boot developer", &kw(&["spring", "spring boot"]));
        assert_eq!(out, "[Spring Boot] developer");
    }

    #[test]
    fn test_highlight_no_keywords() {
        assert_eq!(highlight("unchanged", &[]), "unchanged");
    }

    #[test]
    fn test_strip_markers_recovers_source() {
        let src = "Senior Python developer with Kafka and Python experience";
        let out = highlight(src, &kw(&["python", "kafka"]));
        assert_eq!(out.replace(['[', ']'], ""), src);
    }

    #[test]
    fn test_truncate_char_based() {
        assert_eq!(truncate("данные и python", 6), format!("данные{}", TRUNCATION_MARKER));
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn test_format_evidence_pipeline() {
        let out = format_evidence("  Python\t developer  ", &kw(&["python"]), 100, true);
        assert_eq!(out, "[Python] developer");

        let plain = format_evidence("  Python developer  ", &kw(&["python"]), 100, false);
        assert_eq!(plain, "Python developer");
    }

    #[test]
    fn test_format_evidence_truncates_after_highlight() {
        let out = format_evidence("python python python", &kw(&["python"]), 10, true);
        assert_eq!(out, format!("[python] [{}", TRUNCATION_MARKER));
    }
}
