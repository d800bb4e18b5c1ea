//! Error types for the `docqa-extract` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning a file into chunks.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file extension maps to no known document format.
    #[error("Unsupported file type '{extension}'; supported: {}", .supported.join(", "))]
    UnsupportedFormat {
        /// The offending extension (with leading dot, may be empty).
        extension: String,
        /// The full list of supported extensions.
        supported: Vec<&'static str>,
    },

    /// Format-specific parsing or OCR failed.
    #[error("{format} extraction failed: {message}")]
    Extraction {
        /// The format whose extractor failed.
        format: &'static str,
        /// A description of the failure.
        message: String,
    },

    /// An I/O error while reading the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
