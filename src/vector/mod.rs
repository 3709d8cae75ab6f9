//! Vector search primitives.
//!
//! This module provides the dense vector type used across the pipeline,
//! the index abstraction semantic retrieval runs against, and a Qdrant
//! REST implementation of that abstraction:
//! - Cosine similarity for deduplication and ranking
//! - Payload-carrying hits so index results map back to verse records
//! - Stored-vector passthrough to avoid re-embedding known verses

pub mod index;
pub mod qdrant;
pub mod vector;

pub use index::{VectorHit, VectorIndex};
pub use qdrant::{QdrantConfig, QdrantIndex};
pub use vector::Vector;
