//! The hybrid retrieval pipeline.
//!
//! This module wires the retrieval branches, grading stages, fusion,
//! and deduplication into one query operation:
//! - Lexical and semantic branches retrieve independently
//! - Each branch is gated by LLM relevance grading
//! - Survivors are fused by reciprocal rank, deduplicated by embedding
//!   similarity, scored on the final scale, and truncated to top K

pub mod config;
pub mod engine;
pub mod mapper;
pub mod types;

pub use config::PipelineConfig;
pub use engine::{PipelineStats, SearchPipeline};
pub use types::{FusedCandidate, HitSource, RetrievalHit, ScoredResult};
