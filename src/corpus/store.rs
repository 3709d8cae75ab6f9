//! Line-oriented verse corpus.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SanadError};

/// The retrieval corpus: one verse translation per line, in canonical order.
///
/// Line order is the document order of the lexical index, so two loads of
/// the same file always produce the same ranking for the same query.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    lines: Vec<String>,
}

impl CorpusStore {
    /// Load the corpus from a text file, one document per line.
    ///
    /// Lines are trimmed but otherwise kept verbatim, including blank
    /// lines, so line numbers remain stable against the source file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?.trim().to_string());
        }

        if lines.is_empty() {
            return Err(SanadError::corpus(format!(
                "corpus file is empty: {}",
                path.display()
            )));
        }

        tracing::debug!("loaded {} corpus lines from {}", lines.len(), path.display());
        Ok(CorpusStore { lines })
    }

    /// Build a corpus from in-memory lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        CorpusStore { lines }
    }

    /// All corpus lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line at the given zero-based position.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
