//! Data types that flow between pipeline stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::Verse;

/// Which retrieval branch produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitSource {
    /// BM25 retrieval over the corpus lines.
    Lexical,
    /// Embedding similarity retrieval from the vector index.
    Semantic,
}

impl fmt::Display for HitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitSource::Lexical => write!(f, "lexical"),
            HitSource::Semantic => write!(f, "semantic"),
        }
    }
}

/// A retrieval hit resolved to a verse record.
///
/// `raw_rank` is the 1-based position the hit held in its source's
/// ranking; fusion works from positions, not raw scores, because BM25
/// scores and cosine similarities are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalHit {
    #[serde(flatten)]
    pub verse: Verse,
    pub raw_rank: usize,
    pub raw_score: f32,
    pub source: HitSource,
}

impl RetrievalHit {
    pub fn new(verse: Verse, raw_rank: usize, raw_score: f32, source: HitSource) -> Self {
        RetrievalHit {
            verse,
            raw_rank,
            raw_score,
            source,
        }
    }
}

/// A candidate after reciprocal-rank fusion, before deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedCandidate {
    pub verse: Verse,
    /// Sum of reciprocal-rank contributions across the fused lists.
    pub fused_score: f32,
}

/// One verse in the final pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub verse: Verse,
    /// Relevance grade on the final scale, rounded to two decimals;
    /// 0.00 when the grade could not be obtained.
    pub final_score: f32,
}
