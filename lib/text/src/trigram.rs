//! Character-trigram lexical similarity.
//!
//! The pairwise primitive behind the hybrid score's lexical signal: both
//! strings are lowercased, padded, and decomposed into character trigrams;
//! similarity is the Jaccard index of the two trigram sets. Scores are in
//! [0.0, 1.0] with 1.0 for identical text.

use std::collections::HashSet;

/// Compute trigram similarity between two strings.
pub fn similarity(a: &str, b: &str) -> f32 {
    let trigrams_a = trigram_set(a);
    let trigrams_b = trigram_set(b);

    if trigrams_a.is_empty() && trigrams_b.is_empty() {
        return 1.0;
    }
    if trigrams_a.is_empty() || trigrams_b.is_empty() {
        return 0.0;
    }

    let intersection = trigrams_a.intersection(&trigrams_b).count();
    let union = trigrams_a.union(&trigrams_b).count();

    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Generate the padded, lowercased character-trigram set for a string.
pub fn trigram_set(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s.to_lowercase());
    let chars: Vec<char> = padded.chars().collect();

    if chars.len() < 3 {
        return HashSet::new();
    }

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}
