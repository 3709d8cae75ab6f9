//! Semantic retrieval branch.
//!
//! Wraps an embedder and a vector index into a single retrieval
//! operation that degrades to "unavailable" instead of erroring, so a
//! network outage narrows results rather than failing queries.

pub mod searcher;

pub use searcher::SemanticSearcher;
