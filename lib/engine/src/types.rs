use serde::{Deserialize, Serialize};

/// Identifier of a job posting (the document, the unit of final ranking).
pub type DocumentId = u64;

/// Metadata snapshot of a posting, carried alongside every candidate so a
/// result can be rendered without a second storage round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DocumentMeta {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_employer(mut self, employer: impl Into<String>) -> Self {
        self.employer_name = Some(employer.into());
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area_name = Some(area.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A fragment returned by the storage collaborator's candidate query.
///
/// `distance` is the semantic distance to the query embedding (lower is
/// closer, range [0, 2] for cosine). `lexical` carries the trigram
/// similarity against the raw query text when the lexical index is
/// available, `None` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub doc_id: DocumentId,
    pub meta: DocumentMeta,
    pub fragment_no: u32,
    pub text: String,
    pub distance: f32,
    pub lexical: Option<f32>,
}

/// A candidate after scoring: `combined = distance - weight * lexical`,
/// lower is more relevant. `lexical` is the similarity that actually
/// entered the score - 0.0 whenever the signal was unavailable or unused.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFragment {
    pub doc_id: DocumentId,
    pub meta: DocumentMeta,
    pub fragment_no: u32,
    pub text: String,
    pub distance: f32,
    pub lexical: f32,
    pub combined: f32,
}

/// A document with its best combined score and capped, score-ordered
/// candidate fragments. `best_score` is always the minimum combined score
/// among `fragments`.
#[derive(Debug, Clone)]
pub struct DocumentAggregate {
    pub doc_id: DocumentId,
    pub meta: DocumentMeta,
    pub best_score: f32,
    pub fragments: Vec<ScoredFragment>,
}

/// One formatted quote backing a ranked result.
#[derive(Debug, Clone, Serialize)]
pub struct Evidence {
    pub fragment_no: u32,
    pub text: String,
    pub distance: f32,
    pub lexical: f32,
    pub combined: f32,
    /// 1-based rank of this fragment within its document.
    pub rank: u32,
}

/// Why a document matched: which query keywords and technology terms
/// literally occur in its evidence text.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub query_matches: Vec<String>,
    pub tech_terms: Vec<String>,
}

/// Final output unit of a retrieval: one document with formatted evidence
/// and an optional explanation.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub doc_id: DocumentId,
    #[serde(flatten)]
    pub meta: DocumentMeta,
    pub best_score: f32,
    pub evidence: Vec<Evidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<Explanation>,
}

/// A complete retrieval response: ordered results plus the metadata a
/// caller needs to see whether the lexical signal was actually applied.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub results: Vec<RankedResult>,
    pub hybrid_used: bool,
    pub weight_used: f32,
}
