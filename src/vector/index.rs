//! Vector index abstraction.

use async_trait::async_trait;

use crate::corpus::Verse;
use crate::error::Result;
use crate::vector::Vector;

/// One hit returned from a vector index search.
#[derive(Debug, Clone)]
pub struct VectorHit {
    /// Verse payload stored alongside the vector in the index.
    pub payload: Verse,
    /// Similarity score reported by the index for this hit.
    pub similarity: f32,
    /// The stored embedding of this hit, when the index returns vectors.
    pub vector: Option<Vector>,
}

impl VectorHit {
    pub fn new(payload: Verse, similarity: f32) -> Self {
        VectorHit {
            payload,
            similarity,
            vector: None,
        }
    }

    pub fn with_vector(mut self, vector: Vector) -> Self {
        self.vector = Some(vector);
        self
    }
}

/// Trait for vector indexes that store verse embeddings.
///
/// Implementations are expected to rank by similarity to the query
/// vector, highest first, and to bound the request in time so an
/// unreachable index degrades into an error instead of a hang.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Search for the `limit` nearest verse embeddings to `vector`.
    async fn search(&self, vector: &Vector, limit: usize) -> Result<Vec<VectorHit>>;

    /// Get the name of this index backend.
    fn name(&self) -> &str {
        "unknown"
    }
}
