//! Error types for the `docqa-rag` crate.

use thiserror::Error;

/// Errors that can occur in chunking, embedding, and vector store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    Backend {
        /// The backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The collection behind this handle has been deleted.
    #[error("Collection '{0}' has been deleted; open a new store handle")]
    CollectionDeleted(String),

    /// Parallel input sequences had different lengths.
    #[error("Length mismatch: {texts} texts but {other} {what}")]
    LengthMismatch {
        /// Number of texts supplied.
        texts: usize,
        /// Length of the mismatched sequence.
        other: usize,
        /// Which sequence mismatched (`metadatas` or `ids`).
        what: &'static str,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
