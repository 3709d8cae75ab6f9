//! # Sanad
//!
//! Hybrid retrieval of Quranic verses related to a hadith passage.
//!
//! Two independent retrieval branches (BM25 lexical search over a verse
//! corpus, embedding similarity search against a vector index) are each
//! gated by an LLM relevance grader, merged with reciprocal-rank fusion,
//! deduplicated by embedding cosine similarity, graded on a final scale,
//! and truncated to the top K.
//!
//! ## Features
//!
//! - Okapi BM25 lexical retrieval with a substring variation mode
//! - Embedding-based semantic retrieval with graceful degradation
//! - LLM relevance gating and final scoring with bounded concurrency
//! - Reciprocal-rank fusion and embedding deduplication
//! - Explicit engine object, no global state

pub mod cli;
pub mod corpus;
pub mod dedup;
pub mod embedding;
pub mod error;
pub mod fusion;
pub mod grading;
pub mod lexical;
pub mod normalize;
pub mod pipeline;
pub mod semantic;
pub mod vector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
