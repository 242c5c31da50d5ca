//! Technology-term recognition.
//!
//! A fixed, ordered list of word-boundary patterns covering language names,
//! frameworks, data stores, infra tools and methodology acronyms. A match
//! contributes its canonical term exactly once, in pattern-list order,
//! regardless of how many times it occurs in the text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern-list order is the output order. Canonical terms are lowercase.
const TECH_TERMS: &[&str] = &[
    "java",
    "spring",
    "spring boot",
    "python",
    "go",
    "javascript",
    "typescript",
    "sql",
    "postgres",
    "postgresql",
    "clickhouse",
    "mysql",
    "mongodb",
    "airflow",
    "kafka",
    "redis",
    "kubernetes",
    "docker",
    "terraform",
    "hadoop",
    "spark",
    "flink",
    "databricks",
    "etl",
    "elt",
    "dwh",
    "mlops",
    "ci/cd",
];

static TECH_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    TECH_TERMS
        .iter()
        .map(|term| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
            (Regex::new(&pattern).expect("valid tech pattern"), *term)
        })
        .collect()
});

/// Extract recognized technology terms from `text`, deduplicated, in
/// pattern-list order.
///
/// A term whose every word also appears in a longer matched term is
/// suppressed, so "spring boot" does not additionally emit "spring".
/// Empty input yields an empty vector.
pub fn tech_terms(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut found: Vec<&'static str> = Vec::new();
    for (re, term) in TECH_PATTERNS.iter() {
        if re.is_match(text) && !found.contains(term) {
            found.push(term);
        }
    }

    let contained_in_longer = |term: &str| {
        found
            .iter()
            .any(|other| *other != term && other.split_whitespace().any(|w| w == term))
    };

    found
        .iter()
        .filter(|term| !contained_in_longer(term))
        .map(|term| term.to_string())
        .collect()
}
