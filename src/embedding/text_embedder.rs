//! Text embedding trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to embedding vectors.
///
/// Implementations must be `Send + Sync` so they can be shared between
/// the semantic retrieval and deduplication stages.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Get the dimension of the embedding vectors produced by this embedder.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder.
    fn name(&self) -> &str {
        "unknown"
    }
}
