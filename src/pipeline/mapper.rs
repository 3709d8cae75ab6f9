//! Resolution of raw retrieval hits to stored verse records.
//!
//! Corpus lines and index payloads are curated independently of the
//! metadata store, so both mappings are deliberately lossy: a hit that
//! cannot be resolved to a known verse is dropped, never synthesized.

use crate::corpus::VerseStore;
use crate::embedding::EmbeddingCache;
use crate::lexical::LexicalHit;
use crate::pipeline::types::{HitSource, RetrievalHit};
use crate::vector::VectorHit;

/// Map lexical hits to verse records by normalized translation text.
///
/// `raw_rank` is the hit's 1-based position in the lexical ranking,
/// counted before unmappable hits are dropped.
pub fn map_lexical_hits(hits: &[LexicalHit], verses: &VerseStore) -> Vec<RetrievalHit> {
    let mut mapped = Vec::with_capacity(hits.len());
    for (index, hit) in hits.iter().enumerate() {
        match verses.find_by_text(&hit.text) {
            Some(verse) => mapped.push(RetrievalHit::new(
                verse.clone(),
                index + 1,
                hit.score,
                HitSource::Lexical,
            )),
            None => {
                tracing::debug!("dropping unmappable lexical hit: {:?}", hit.text);
            }
        }
    }
    mapped
}

/// Map semantic hits to verse records by identity key.
///
/// Hits whose payload key is unknown to the store are dropped. When the
/// index returned a stored vector for a resolved hit, it is seeded into
/// the cache so deduplication can skip re-embedding that verse.
pub fn map_semantic_hits(
    hits: &[VectorHit],
    verses: &VerseStore,
    cache: Option<&EmbeddingCache>,
) -> Vec<RetrievalHit> {
    let mut mapped = Vec::with_capacity(hits.len());
    for (index, hit) in hits.iter().enumerate() {
        let key = hit.payload.key();
        match verses.find_by_key(&key) {
            Some(verse) => {
                if let (Some(cache), Some(vector)) = (cache, &hit.vector) {
                    cache.insert(key, vector.clone());
                }
                mapped.push(RetrievalHit::new(
                    verse.clone(),
                    index + 1,
                    hit.similarity,
                    HitSource::Semantic,
                ));
            }
            None => {
                tracing::debug!("dropping semantic hit for unknown verse {key}");
            }
        }
    }
    mapped
}
