//! Semantic retrieval over the vector index.

use std::sync::Arc;

use crate::corpus::VerseStore;
use crate::embedding::{EmbeddingCache, TextEmbedder};
use crate::pipeline::mapper::map_semantic_hits;
use crate::pipeline::types::RetrievalHit;
use crate::vector::VectorIndex;

/// Embeds the query and searches the vector index for nearby verses.
///
/// Both the embedding call and the index search can fail on network
/// trouble. Neither failure escapes this type: `search` answers `None`
/// and the orchestrator carries on with lexical retrieval alone.
pub struct SemanticSearcher {
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorIndex>,
    verses: Arc<VerseStore>,
    cache: Arc<EmbeddingCache>,
}

impl SemanticSearcher {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
        verses: Arc<VerseStore>,
        cache: Arc<EmbeddingCache>,
    ) -> Self {
        SemanticSearcher {
            embedder,
            index,
            verses,
            cache,
        }
    }

    /// Retrieve up to `limit` verses near the query in embedding space.
    ///
    /// Returns `None` when the branch is unavailable (embedding or index
    /// failure) and `Some` with mapped hits otherwise; an empty `Some`
    /// means the branch ran and found nothing.
    pub async fn search(&self, query: &str, limit: usize) -> Option<Vec<RetrievalHit>> {
        let query_vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!("query embedding failed, skipping semantic retrieval: {e}");
                return None;
            }
        };

        let hits = match self.index.search(&query_vector, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("vector index search failed, skipping semantic retrieval: {e}");
                return None;
            }
        };

        Some(map_semantic_hits(&hits, &self.verses, Some(&self.cache)))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::corpus::Verse;
    use crate::error::{Result, SanadError};
    use crate::vector::{Vector, VectorHit};

    struct FixedEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl TextEmbedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vector> {
            if self.fail {
                Err(SanadError::embedding("embedding service down"))
            } else {
                Ok(Vector::new(vec![1.0, 0.0]))
            }
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct FixedIndex {
        hits: Vec<VectorHit>,
        fail: bool,
    }

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn search(&self, _vector: &Vector, limit: usize) -> Result<Vec<VectorHit>> {
            if self.fail {
                Err(SanadError::vector_search("index unreachable"))
            } else {
                Ok(self.hits.iter().take(limit).cloned().collect())
            }
        }
    }

    fn verses() -> Arc<VerseStore> {
        Arc::new(
            VerseStore::from_verses(vec![Verse::new("Al-Fatihah", 1, "In the name of Allah.")])
                .unwrap(),
        )
    }

    fn searcher(embed_fail: bool, index_fail: bool, hits: Vec<VectorHit>) -> SemanticSearcher {
        SemanticSearcher::new(
            Arc::new(FixedEmbedder { fail: embed_fail }),
            Arc::new(FixedIndex {
                hits,
                fail: index_fail,
            }),
            verses(),
            Arc::new(EmbeddingCache::new()),
        )
    }

    #[tokio::test]
    async fn test_search_maps_hits() {
        let hits = vec![VectorHit::new(Verse::new("Al-Fatihah", 1, "drifted"), 0.92)];
        let searcher = searcher(false, false, hits);

        let result = searcher.search("mercy", 10).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].raw_score, 0.92);
        assert_eq!(result[0].verse.translation_text, "In the name of Allah.");
    }

    #[tokio::test]
    async fn test_embedding_failure_returns_none() {
        let searcher = searcher(true, false, Vec::new());
        assert!(searcher.search("mercy", 10).await.is_none());
    }

    #[tokio::test]
    async fn test_index_failure_returns_none() {
        let searcher = searcher(false, true, Vec::new());
        assert!(searcher.search("mercy", 10).await.is_none());
    }

    #[tokio::test]
    async fn test_no_hits_is_some_empty() {
        let searcher = searcher(false, false, Vec::new());
        let result = searcher.search("mercy", 10).await;
        assert_eq!(result, Some(Vec::new()));
    }
}
