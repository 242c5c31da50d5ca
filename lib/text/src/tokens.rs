//! Query tokenization and keyword ranking.
//!
//! Tokenization is intentionally crude pattern matching, not lemmatization:
//! contiguous runs of Latin/Cyrillic letters, digits, `+`, `#` and `.` of
//! length >= 3. A fixed bilingual stopword set removes functional words and
//! domain filler ("vacancy", "internship", ...).

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zа-я0-9+#.]{3,}").expect("valid token pattern"));

static RU_STOP: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "и", "в", "во", "на", "по", "к", "ко", "из", "у", "за", "для", "про", "под", "над", "с",
        "со", "о", "об", "от", "до", "при", "как", "а", "но", "или", "что", "это", "мы", "вы",
        "они", "он", "она", "оно", "я", "ты", "его", "ее", "их", "наш", "ваш", "требуется",
        "нужен", "нужна", "нужны", "ищем", "работа", "вакансия", "стажировка", "intern",
        "internship", "junior", "middle", "senior",
    ]
    .into_iter()
    .collect()
});

static EN_STOP: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "or", "the", "a", "an", "to", "for", "of", "in", "on", "with", "from", "as", "is",
        "are", "be", "this", "that", "job", "vacancy", "needed", "looking",
    ]
    .into_iter()
    .collect()
});

/// Tokenize `text` and drop stopwords, preserving occurrence order.
///
/// Returns an empty vector for empty or whitespace-only input.
pub fn content_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !RU_STOP.contains(t.as_str()) && !EN_STOP.contains(t.as_str()))
        .collect()
}

/// Extract the top-`max_words` query keywords, ranked by descending
/// frequency. Ties are broken by first occurrence order.
pub fn query_keywords(text: &str, max_words: usize) -> Vec<String> {
    if max_words == 0 {
        return Vec::new();
    }

    let tokens = content_tokens(text);

    // token -> (count, first occurrence index)
    let mut counts: AHashMap<String, (usize, usize)> = AHashMap::new();
    for (idx, token) in tokens.into_iter().enumerate() {
        let entry = counts.entry(token).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(max_words);
    ranked.into_iter().map(|(token, _, _)| token).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization_length_and_charset() {
        let tokens = content_tokens("Go C++ c# python3 ML etl");
        // "Go" and "ML" are too short; "c#" is only two chars.
        assert_eq!(tokens, vec!["c++", "python3", "etl"]);
    }

    #[test]
    fn test_stopwords_filtered_bilingual() {
        let tokens = content_tokens("требуется senior python разработчик for the job");
        assert_eq!(tokens, vec!["python", "разработчик"]);
    }

    #[test]
    fn test_keywords_ranked_by_frequency() {
        let kws = query_keywords("kafka python kafka airflow kafka python", 10);
        assert_eq!(kws[0], "kafka");
        assert_eq!(kws[1], "python");
        assert_eq!(kws[2], "airflow");
    }

    #[test]
    fn test_keyword_ties_broken_by_first_occurrence() {
        let kws = query_keywords("redis docker kubernetes", 10);
        assert_eq!(kws, vec!["redis", "docker", "kubernetes"]);
    }

    #[test]
    fn test_keyword_cap() {
        let kws = query_keywords("one1 two2 three3 four4 five5", 3);
        assert_eq!(kws.len(), 3);
        assert!(query_keywords("one1 two2", 0).is_empty());
    }

    #[test]
    fn test_empty_text_yields_empty_output() {
        assert!(content_tokens("").is_empty());
        assert!(content_tokens("   \n\t").is_empty());
        assert!(query_keywords("", 12).is_empty());
    }

    #[test]
    fn test_cyrillic_keywords() {
        let kws = query_keywords("ищем инженера данных, опыт с данными", 10);
        assert!(kws.contains(&"инженера".to_string()));
        assert!(!kws.contains(&"ищем".to_string()));
    }
}
