//! Query orchestration across retrieval, gating, fusion, deduplication,
//! and final scoring.

use std::sync::Arc;

use serde::Serialize;

use crate::corpus::{CorpusStore, VerseStore};
use crate::dedup::Deduplicator;
use crate::embedding::{EmbeddingCache, TextEmbedder};
use crate::error::Result;
use crate::fusion;
use crate::grading::{FinalScorer, Grader, RelevanceFilter};
use crate::lexical::LexicalEngine;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::mapper::map_lexical_hits;
use crate::pipeline::types::ScoredResult;
use crate::semantic::SemanticSearcher;
use crate::vector::VectorIndex;

/// Runtime statistics for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Documents in the lexical index.
    pub corpus_documents: usize,
    /// Verse records in the metadata store.
    pub verse_records: usize,
    /// Distinct terms in the lexical vocabulary.
    pub vocabulary_size: usize,
    /// Average corpus document length in tokens.
    pub avg_doc_length: f32,
    /// Verse embeddings currently cached.
    pub cached_embeddings: usize,
}

/// The hybrid retrieval pipeline.
///
/// Construction wires every stage once; queries then run against
/// read-only state, so one pipeline can serve queries for the process
/// lifetime. Per-query flow:
///
/// ```text
/// query -> semantic retrieval -> relevance gate \
///                                                fuse -> dedup -> final score -> top K
///          lexical retrieval  -> relevance gate /
/// ```
///
/// A failed semantic branch degrades to lexical-only fusion; if both
/// branches come up empty the query answers with an empty list, which
/// callers must read as "no matches", not an error.
pub struct SearchPipeline {
    lexical: LexicalEngine,
    semantic: SemanticSearcher,
    relevance: RelevanceFilter,
    scorer: FinalScorer,
    dedup: Deduplicator,
    verses: Arc<VerseStore>,
    cache: Arc<EmbeddingCache>,
    config: PipelineConfig,
}

impl SearchPipeline {
    /// Build a pipeline over loaded stores and service backends.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or an unindexable corpus; both are
    /// startup errors, never query-time ones.
    pub fn new(
        corpus: Arc<CorpusStore>,
        verses: Arc<VerseStore>,
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
        grader: Arc<dyn Grader>,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let lexical = LexicalEngine::new(corpus, config.lexical.clone())?;
        let cache = Arc::new(EmbeddingCache::new());
        let semantic = SemanticSearcher::new(
            embedder.clone(),
            index,
            verses.clone(),
            cache.clone(),
        );
        let relevance = RelevanceFilter::new(
            grader.clone(),
            config.relevance_scale,
            config.relevance_threshold,
            config.grading_concurrency,
        );
        let scorer = FinalScorer::new(grader, config.final_scale, config.grading_concurrency);
        let dedup = Deduplicator::new(embedder, cache.clone(), config.dedup_threshold);

        Ok(SearchPipeline {
            lexical,
            semantic,
            relevance,
            scorer,
            dedup,
            verses,
            cache,
            config,
        })
    }

    /// Run one query through the full pipeline.
    ///
    /// Returns at most `final_k` results, descending by final score.
    pub async fn search(&self, query: &str) -> Result<Vec<ScoredResult>> {
        if query.trim().is_empty() {
            tracing::debug!("empty query, answering with no results");
            return Ok(Vec::new());
        }

        let depth = self.config.retrieval_depth;

        let filtered_semantic = match self.semantic.search(query, depth).await {
            Some(hits) if !hits.is_empty() => self.relevance.filter(hits, query).await,
            Some(_) => Vec::new(),
            None => {
                tracing::debug!("continuing with lexical retrieval only");
                Vec::new()
            }
        };

        let lexical_raw = self.lexical.search(query, depth);
        let lexical_hits = map_lexical_hits(&lexical_raw, &self.verses);
        let filtered_lexical = if lexical_hits.is_empty() {
            Vec::new()
        } else {
            self.relevance.filter(lexical_hits, query).await
        };

        if filtered_semantic.is_empty() && filtered_lexical.is_empty() {
            tracing::debug!("no candidates survived retrieval and gating");
            return Ok(Vec::new());
        }

        let fused = fusion::fuse(&filtered_semantic, &filtered_lexical, self.config.rrf_k);
        tracing::debug!(
            "fused {} semantic + {} lexical candidates into {}",
            filtered_semantic.len(),
            filtered_lexical.len(),
            fused.len()
        );

        let unique = self.dedup.deduplicate(fused).await;
        let mut results = self.scorer.score(unique, query).await;

        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.config.final_k);
        Ok(results)
    }

    /// The pipeline configuration in effect.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runtime statistics for diagnostics.
    pub fn stats(&self) -> PipelineStats {
        let lexical = self.lexical.stats();
        PipelineStats {
            corpus_documents: lexical.document_count,
            verse_records: self.verses.len(),
            vocabulary_size: lexical.vocabulary_size,
            avg_doc_length: lexical.avg_doc_length,
            cached_embeddings: self.cache.len(),
        }
    }
}
