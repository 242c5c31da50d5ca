//! Fragment-to-document aggregation.
//!
//! In-memory re-expression of the windowed ranking the original system ran
//! in SQL (`row_number` and `min` over a per-document partition): rank each
//! fragment within its document by combined score, keep the best `per_doc`
//! of them, rank documents by their best fragment, cut to `k`.

use ahash::AHashMap;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;

use crate::types::{DocumentAggregate, DocumentId, ScoredFragment};

/// Aggregate a distance-ordered stream of scored fragments into the top-`k`
/// documents.
///
/// Documents are ordered by their best (minimum) combined score ascending;
/// ties keep first-seen order in the candidate stream. Within a document,
/// fragments are ordered by their own combined score ascending and capped
/// at `per_doc`. A document outside the top `k` is dropped entirely, even
/// if some of its fragments individually scored well.
///
/// An empty stream returns an empty list. `per_doc == 0` or `k == 0` is a
/// no-op cap that removes everything.
pub fn aggregate(
    scored: Vec<ScoredFragment>,
    per_doc: usize,
    k: usize,
) -> Vec<DocumentAggregate> {
    if per_doc == 0 || k == 0 || scored.is_empty() {
        return Vec::new();
    }

    // Group by document, remembering first-seen order in the stream.
    let mut order: Vec<DocumentId> = Vec::new();
    let mut groups: AHashMap<DocumentId, Vec<(usize, ScoredFragment)>> = AHashMap::new();
    for (stream_idx, fragment) in scored.into_iter().enumerate() {
        let group = match groups.entry(fragment.doc_id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(v) => {
                order.push(fragment.doc_id);
                v.insert(Vec::new())
            }
        };
        group.push((stream_idx, fragment));
    }

    let mut documents: Vec<DocumentAggregate> = Vec::with_capacity(order.len());
    for doc_id in order {
        let mut fragments = groups.remove(&doc_id).unwrap_or_default();
        // Rank within document: combined ascending, stream order on ties.
        fragments.sort_by(|a, b| {
            a.1.combined
                .partial_cmp(&b.1.combined)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        fragments.truncate(per_doc);

        let best_score = fragments[0].1.combined;
        let meta = fragments[0].1.meta.clone();
        documents.push(DocumentAggregate {
            doc_id,
            meta,
            best_score,
            fragments: fragments.into_iter().map(|(_, f)| f).collect(),
        });
    }

    // Stable sort: documents sharing a best score keep first-seen order.
    documents.sort_by(|a, b| {
        a.best_score
            .partial_cmp(&b.best_score)
            .unwrap_or(Ordering::Equal)
    });
    documents.truncate(k);
    documents
}
