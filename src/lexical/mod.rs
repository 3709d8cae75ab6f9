//! Lexical retrieval over the verse corpus.
//!
//! This module provides exact-term BM25 ranking and a substring-based
//! variation search for catching morphological variants:
//! - Okapi BM25 with negative-IDF flooring
//! - Deterministic rankings (ties broken by document order)
//! - Parallel scoring across the corpus

pub mod engine;

pub use engine::{LexicalEngine, LexicalHit, LexicalParams, LexicalStats};
