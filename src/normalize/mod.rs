//! Hadith content normalization.
//!
//! Hadith passages usually open with a transmission chain ("It was
//! narrated from X, from Y, that ..."). Retrieval quality improves when
//! the query is the hadith wording alone, so normalization separates the
//! narrator chain from the content before the pipeline runs.

pub mod pattern;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use pattern::PatternNormalizer;

/// A hadith text split into its content and transmission chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuery {
    /// The hadith wording, used as the retrieval query.
    pub content: String,
    /// Narrators in the order they appear in the chain; empty when no
    /// chain was recognized.
    pub narrators: Vec<String>,
}

/// Trait for extracting the content and narrator chain from raw hadith
/// text.
///
/// Implementations must degrade to passing the text through unchanged
/// when they cannot recognize a chain; normalization is an aid, never a
/// gate.
#[async_trait]
pub trait ContentNormalizer: Send + Sync {
    /// Split raw hadith text into content and narrators.
    async fn normalize(&self, raw_text: &str) -> Result<NormalizedQuery>;

    /// Get the name/identifier of this normalizer.
    fn name(&self) -> &str {
        "unknown"
    }
}
