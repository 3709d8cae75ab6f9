//! Embedding-based near-duplicate removal.
//!
//! The fused candidate list can carry verses that are distinct records
//! but near-identical text (repeated refrains, close parallel passages).
//! Deduplication walks the list in rank order and drops any candidate
//! whose embedding is too similar to one already accepted, so the
//! highest-ranked occurrence of each cluster survives. The pass is
//! O(n²) over the fused list, which is tens of items after filtering;
//! it is never applied to corpus-sized input.

use std::sync::Arc;

use crate::corpus::VerseKey;
use crate::embedding::{EmbeddingCache, TextEmbedder};
use crate::pipeline::types::FusedCandidate;
use crate::vector::Vector;

/// Default cosine similarity above which two candidates are duplicates.
pub const DEFAULT_DEDUP_THRESHOLD: f32 = 0.95;

/// Removes near-duplicate candidates by embedding cosine similarity.
pub struct Deduplicator {
    embedder: Arc<dyn TextEmbedder>,
    cache: Arc<EmbeddingCache>,
    threshold: f32,
}

impl Deduplicator {
    pub fn new(embedder: Arc<dyn TextEmbedder>, cache: Arc<EmbeddingCache>, threshold: f32) -> Self {
        Deduplicator {
            embedder,
            cache,
            threshold,
        }
    }

    /// Drop candidates whose similarity to an already-accepted candidate
    /// exceeds the threshold, preserving input order.
    ///
    /// A candidate whose embedding cannot be obtained is kept rather
    /// than dropped; losing a result to an embedding hiccup is worse
    /// than letting a rare duplicate through. Its embedding is not
    /// remembered, so it cannot absorb later candidates either.
    pub async fn deduplicate(&self, candidates: Vec<FusedCandidate>) -> Vec<FusedCandidate> {
        let mut unique: Vec<FusedCandidate> = Vec::with_capacity(candidates.len());
        let mut seen: Vec<Vector> = Vec::new();

        for candidate in candidates {
            let key = candidate.verse.key();
            let embedding = match self.embedding_for(&key, &candidate.verse.translation_text).await
            {
                Ok(embedding) => embedding,
                Err(e) => {
                    tracing::warn!("keeping {key} undeduplicated (embedding failed: {e})");
                    unique.push(candidate);
                    continue;
                }
            };

            let mut duplicate = false;
            for accepted in &seen {
                match embedding.cosine_similarity(accepted) {
                    Ok(similarity) if similarity > self.threshold => {
                        tracing::debug!(
                            "dropping {key} as duplicate (similarity {similarity:.4})"
                        );
                        duplicate = true;
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("similarity check failed for {key}: {e}");
                    }
                }
            }

            if !duplicate {
                seen.push(embedding);
                unique.push(candidate);
            }
        }

        unique
    }

    /// Fetch the embedding for a verse, consulting the cache first.
    async fn embedding_for(&self, key: &VerseKey, text: &str) -> crate::error::Result<Vector> {
        if let Some(cached) = self.cache.get(key) {
            return Ok(cached);
        }
        let embedding = self.embedder.embed(text).await?;
        self.cache.insert(key.clone(), embedding.clone());
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::corpus::Verse;
    use crate::error::{Result, SanadError};

    /// Embedder scripted by substrings of the input text.
    struct ScriptedEmbedder {
        vectors: Vec<(&'static str, Vec<f32>)>,
        calls: AtomicUsize,
    }

    impl ScriptedEmbedder {
        fn new(vectors: Vec<(&'static str, Vec<f32>)>) -> Self {
            ScriptedEmbedder {
                vectors,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextEmbedder for ScriptedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for (needle, data) in &self.vectors {
                if text.contains(needle) {
                    return Ok(Vector::new(data.clone()));
                }
            }
            Err(SanadError::embedding("unscripted text"))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn candidate(surah: &str, aya: u32, text: &str, fused_score: f32) -> FusedCandidate {
        FusedCandidate {
            verse: Verse::new(surah, aya, text),
            fused_score,
        }
    }

    fn dedup_with(
        vectors: Vec<(&'static str, Vec<f32>)>,
    ) -> (Deduplicator, Arc<ScriptedEmbedder>, Arc<EmbeddingCache>) {
        let embedder = Arc::new(ScriptedEmbedder::new(vectors));
        let cache = Arc::new(EmbeddingCache::new());
        let dedup = Deduplicator::new(embedder.clone(), cache.clone(), DEFAULT_DEDUP_THRESHOLD);
        (dedup, embedder, cache)
    }

    #[tokio::test]
    async fn test_drops_near_duplicate_keeps_first() {
        let (dedup, _, _) = dedup_with(vec![
            ("refrain one", vec![1.0, 0.0]),
            ("refrain two", vec![0.9999, 0.01]),
            ("unrelated", vec![0.0, 1.0]),
        ]);

        let unique = dedup
            .deduplicate(vec![
                candidate("A", 1, "refrain one", 0.03),
                candidate("A", 2, "refrain two", 0.02),
                candidate("B", 1, "unrelated", 0.01),
            ])
            .await;

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].verse.aya_number, 1);
        assert_eq!(unique[0].verse.surah_name, "A");
        assert_eq!(unique[1].verse.surah_name, "B");
    }

    #[tokio::test]
    async fn test_keeps_distinct_candidates() {
        let (dedup, _, _) = dedup_with(vec![
            ("first", vec![1.0, 0.0]),
            ("second", vec![0.0, 1.0]),
        ]);

        let unique = dedup
            .deduplicate(vec![
                candidate("A", 1, "first", 0.03),
                candidate("A", 2, "second", 0.02),
            ])
            .await;

        assert_eq!(unique.len(), 2);
    }

    #[tokio::test]
    async fn test_idempotent() {
        let (dedup, _, _) = dedup_with(vec![
            ("first", vec![1.0, 0.0]),
            ("echo", vec![0.999, 0.02]),
            ("second", vec![0.0, 1.0]),
        ]);

        let input = vec![
            candidate("A", 1, "first", 0.03),
            candidate("A", 2, "echo", 0.02),
            candidate("A", 3, "second", 0.01),
        ];
        let once = dedup.deduplicate(input).await;
        let twice = dedup.deduplicate(once.clone()).await;

        assert_eq!(once, twice);
        assert!(once.len() <= 3);
    }

    #[tokio::test]
    async fn test_embed_failure_keeps_candidate() {
        // "mystery" is unscripted: embedding it fails.
        let (dedup, _, _) = dedup_with(vec![("first", vec![1.0, 0.0])]);

        let unique = dedup
            .deduplicate(vec![
                candidate("A", 1, "first", 0.03),
                candidate("A", 2, "mystery", 0.02),
            ])
            .await;

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].verse.aya_number, 2);
    }

    #[tokio::test]
    async fn test_cache_short_circuits_embedder() {
        let (dedup, embedder, cache) = dedup_with(vec![("first", vec![1.0, 0.0])]);
        cache.insert(VerseKey::new("A", 1), Vector::new(vec![1.0, 0.0]));

        let unique = dedup
            .deduplicate(vec![candidate("A", 1, "first", 0.03)])
            .await;

        assert_eq!(unique.len(), 1);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_populates_cache() {
        let (dedup, embedder, cache) = dedup_with(vec![("first", vec![1.0, 0.0])]);

        dedup
            .deduplicate(vec![candidate("A", 1, "first", 0.03)])
            .await;
        assert_eq!(cache.len(), 1);

        // A second pass over the same verse hits the cache.
        dedup
            .deduplicate(vec![candidate("A", 1, "first", 0.03)])
            .await;
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (dedup, _, _) = dedup_with(vec![]);
        assert!(dedup.deduplicate(Vec::new()).await.is_empty());
    }
}
