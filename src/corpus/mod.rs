//! Verse corpus and metadata loading.
//!
//! This module provides the two data sources the retrieval pipeline is
//! built over:
//! - A line-oriented corpus of verse translations ([`CorpusStore`]) whose
//!   line order defines lexical document order
//! - A metadata store of verse records ([`VerseStore`]) with lookup by
//!   normalized translation text and by verse identity

pub mod store;
pub mod verse;

pub use store::CorpusStore;
pub use verse::{Verse, VerseKey, VerseStore, normalize_text};
