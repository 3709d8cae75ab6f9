//! Reciprocal-rank fusion of ranked candidate lists.
//!
//! Fusion works from list positions, not raw scores: BM25 scores and
//! cosine similarities live on incomparable scales, while ranks are
//! always comparable. Each verse scores `Σ 1/(k + rank)` over the lists
//! it appears in, using 1-based ranks, so appearing in both lists always
//! beats appearing in one at the same rank.

use ahash::AHashMap;

use crate::corpus::VerseKey;
use crate::pipeline::types::{FusedCandidate, RetrievalHit};

/// Default dampening constant for reciprocal-rank fusion.
pub const DEFAULT_RRF_K: usize = 60;

/// Fuse two ranked hit lists into one ranking.
///
/// Verses are identified by their identity key, so the same verse
/// reached by both branches accumulates both contributions. Output is
/// sorted descending by fused score; ties keep first-encounter order
/// (`list_a` before `list_b`), which makes the ordering reproducible
/// for identical inputs and `k`. A larger `k` flattens the influence
/// of rank differences.
pub fn fuse(list_a: &[RetrievalHit], list_b: &[RetrievalHit], k: usize) -> Vec<FusedCandidate> {
    let mut slots: AHashMap<VerseKey, usize> = AHashMap::new();
    let mut fused: Vec<FusedCandidate> = Vec::new();

    for list in [list_a, list_b] {
        for (index, hit) in list.iter().enumerate() {
            let contribution = 1.0 / (k as f32 + (index + 1) as f32);
            match slots.entry(hit.verse.key()) {
                std::collections::hash_map::Entry::Occupied(entry) => {
                    fused[*entry.get()].fused_score += contribution;
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(fused.len());
                    fused.push(FusedCandidate {
                        verse: hit.verse.clone(),
                        fused_score: contribution,
                    });
                }
            }
        }
    }

    fused.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused
}
