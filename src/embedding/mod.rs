//! Text embedding generation and caching.
//!
//! This module provides the embedding abstraction used by semantic
//! retrieval and deduplication, an OpenAI-backed implementation, and a
//! verse-identity-keyed cache that lets deduplication reuse vectors the
//! index already returned.

pub mod cache;
pub mod openai;
pub mod text_embedder;

pub use cache::EmbeddingCache;
pub use openai::{OpenAiEmbedderConfig, OpenAiTextEmbedder};
pub use text_embedder::TextEmbedder;
