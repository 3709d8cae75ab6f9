//! Command implementations for the Sanad CLI.

use std::sync::Arc;
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::{CorpusStore, VerseStore};
use crate::embedding::{OpenAiEmbedderConfig, OpenAiTextEmbedder};
use crate::error::Result;
use crate::grading::{OpenAiGrader, OpenAiGraderConfig};
use crate::lexical::{LexicalEngine, LexicalParams};
use crate::normalize::{ContentNormalizer, PatternNormalizer};
use crate::pipeline::mapper::map_lexical_hits;
use crate::pipeline::{PipelineConfig, SearchPipeline};
use crate::vector::{QdrantConfig, QdrantIndex};

/// Execute a CLI command.
pub async fn execute_command(args: SanadArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => run_search(search_args.clone(), &args).await,
        Command::KeywordSearch(keyword_args) => keyword_search(keyword_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

fn load_stores(args: &StoreArgs) -> Result<(Arc<CorpusStore>, Arc<VerseStore>)> {
    let corpus = Arc::new(CorpusStore::load(&args.corpus)?);
    let verses = Arc::new(VerseStore::load(&args.metadata)?);
    Ok((corpus, verses))
}

/// Run a hadith passage through the full retrieval pipeline.
async fn run_search(args: SearchArgs, cli_args: &SanadArgs) -> Result<()> {
    let (corpus, verses) = load_stores(&args.stores)?;

    let embedder = Arc::new(OpenAiTextEmbedder::new(OpenAiEmbedderConfig {
        api_key: args.api_key.clone(),
        model: args.embedding_model.clone(),
        timeout_secs: args.timeout,
        ..OpenAiEmbedderConfig::default()
    })?);
    let index = Arc::new(QdrantIndex::new(QdrantConfig {
        url: args.qdrant_url.clone(),
        api_key: args.qdrant_api_key.clone(),
        collection: args.collection.clone(),
        timeout_secs: args.timeout,
    })?);
    let grader = Arc::new(OpenAiGrader::new(OpenAiGraderConfig {
        api_key: args.api_key.clone(),
        model: args.chat_model.clone(),
        timeout_secs: args.timeout,
        ..OpenAiGraderConfig::default()
    })?);

    let config = PipelineConfig {
        retrieval_depth: args.depth,
        relevance_threshold: args.threshold,
        final_k: args.limit,
        grading_concurrency: args.concurrency,
        ..PipelineConfig::default()
    };
    let pipeline = SearchPipeline::new(corpus, verses, embedder, index, grader, config)?;

    let (query, narrators) = if args.extract_content {
        let normalizer = PatternNormalizer::new()?;
        let normalized = normalizer.normalize(&args.query).await?;
        (normalized.content, normalized.narrators)
    } else {
        (args.query.clone(), Vec::new())
    };

    let start_time = Instant::now();
    let results = pipeline.search(&query).await?;
    let duration_ms = start_time.elapsed().as_millis() as u64;

    output_result(
        &SearchOutput {
            query,
            narrators,
            results,
            duration_ms,
        },
        cli_args,
    )
}

/// Lexical-only search over the corpus, no external services.
fn keyword_search(args: KeywordSearchArgs, cli_args: &SanadArgs) -> Result<()> {
    let (corpus, verses) = load_stores(&args.stores)?;
    let engine = LexicalEngine::new(corpus, LexicalParams::default())?;

    let start_time = Instant::now();
    let (mode, raw_hits) = if args.variations {
        ("variations", engine.search_with_variations(&args.query, args.limit))
    } else {
        ("bm25", engine.search(&args.query, args.limit))
    };
    let mapped = map_lexical_hits(&raw_hits, &verses);
    let duration_ms = start_time.elapsed().as_millis() as u64;

    let hits = mapped
        .into_iter()
        .map(|hit| KeywordHit {
            score: hit.raw_score,
            surah_name: hit.verse.surah_name,
            aya_number: hit.verse.aya_number,
            translation: hit.verse.translation_text,
        })
        .collect::<Vec<_>>();
    let unmapped = raw_hits.len() - hits.len();

    output_result(
        &KeywordSearchOutput {
            query: args.query,
            mode,
            hits,
            unmapped,
            duration_ms,
        },
        cli_args,
    )
}

/// Show corpus and index statistics.
fn show_stats(args: StatsArgs, cli_args: &SanadArgs) -> Result<()> {
    let (corpus, verses) = load_stores(&args.stores)?;
    let engine = LexicalEngine::new(corpus, LexicalParams::default())?;
    let stats = engine.stats();

    output_result(
        &StatsOutput {
            corpus_documents: stats.document_count,
            verse_records: verses.len(),
            vocabulary_size: stats.vocabulary_size,
            avg_doc_length: stats.avg_doc_length,
        },
        cli_args,
    )
}
