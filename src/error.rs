//! Error types for the Sanad library.
//!
//! This module provides comprehensive error handling for all Sanad operations.
//! All errors are represented by the [`SanadError`] enum, which provides
//! detailed information about what went wrong.
//!
//! # Examples
//!
//! ```
//! use sanad::error::{Result, SanadError};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(SanadError::corpus("metadata file is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Sanad operations.
///
/// This enum represents all possible errors that can occur in the Sanad library.
/// It uses the `thiserror` crate for automatic `Error` trait implementation and
/// provides convenient constructor methods for creating specific error types.
#[derive(Error, Debug)]
pub enum SanadError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Corpus errors (verse corpus or metadata loading)
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Lexical index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Embedding service errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index errors
    #[error("Vector search error: {0}")]
    VectorSearch(String),

    /// Grading service errors
    #[error("Grading error: {0}")]
    Grading(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SanadError.
pub type Result<T> = std::result::Result<T, SanadError>;

impl SanadError {
    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        SanadError::Corpus(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        SanadError::Index(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        SanadError::Embedding(msg.into())
    }

    /// Create a new vector search error.
    pub fn vector_search<S: Into<String>>(msg: S) -> Self {
        SanadError::VectorSearch(msg.into())
    }

    /// Create a new grading error.
    pub fn grading<S: Into<String>>(msg: S) -> Self {
        SanadError::Grading(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        SanadError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SanadError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SanadError::InvalidOperation(format!("Invalid configuration: {}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SanadError::corpus("Test corpus error");
        assert_eq!(error.to_string(), "Corpus error: Test corpus error");

        let error = SanadError::embedding("Test embedding error");
        assert_eq!(error.to_string(), "Embedding error: Test embedding error");

        let error = SanadError::grading("Test grading error");
        assert_eq!(error.to_string(), "Grading error: Test grading error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let sanad_error = SanadError::from(io_error);

        match sanad_error {
            SanadError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_invalid_config_message() {
        let error = SanadError::invalid_config("dedup threshold out of range");
        assert_eq!(
            error.to_string(),
            "Invalid operation: Invalid configuration: dedup threshold out of range"
        );
    }
}
