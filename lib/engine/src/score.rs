//! Candidate scoring: the two-signal combination.
//!
//! `combined = distance - weight * lexical_similarity`, lower is better.
//! The combined score is a relative ranking key, not a probability: it is
//! never clamped and may go negative.

use crate::types::{Candidate, ScoredFragment};

/// Combine semantic distance with the optional lexical signal.
///
/// Returns `(combined, lexical_reported)`. When the lexical similarity is
/// unavailable or `weight` is not positive, the combined score degrades to
/// the pure distance and the lexical similarity is reported as 0.0 for
/// transparency, never omitted.
pub fn combined_score(distance: f32, lexical: Option<f32>, weight: f32) -> (f32, f32) {
    match lexical {
        Some(sim) if weight > 0.0 => (distance - weight * sim, sim),
        _ => (distance, 0.0),
    }
}

/// Score a single candidate fragment.
pub fn score_candidate(candidate: Candidate, weight: f32) -> ScoredFragment {
    let (combined, lexical) = combined_score(candidate.distance, candidate.lexical, weight);
    ScoredFragment {
        doc_id: candidate.doc_id,
        meta: candidate.meta,
        fragment_no: candidate.fragment_no,
        text: candidate.text,
        distance: candidate.distance,
        lexical,
        combined,
    }
}
