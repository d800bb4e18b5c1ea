//! Fixed-size text chunking with overlap.
//!
//! Every document format goes through the same splitter: a window of
//! `size` characters slides over the text with step `size - overlap`,
//! and the final window is truncated to end exactly at the end of the
//! text. Concatenating consecutive chunks with the overlap removed
//! reconstructs the original text.

use crate::error::{Result, StoreError};

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// Window arithmetic is in characters, not bytes, so multi-byte text
/// (the corpus here is mixed Chinese and English) never splits inside
/// a code point.
///
/// # Example
///
/// ```rust
/// use docqa_rag::TextChunker;
///
/// let chunker = TextChunker::new(1000, 200).unwrap();
/// let chunks = chunker.split("some document text");
/// assert_eq!(chunks.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TextChunker {
    size: usize,
    overlap: usize,
}

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

impl TextChunker {
    /// Create a new `TextChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if `size` is zero or
    /// `overlap >= size` — a non-positive window step would never
    /// reach the end of the text.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(StoreError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= size {
            return Err(StoreError::Config(format!(
                "chunk overlap ({overlap}) must be less than chunk size ({size})"
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Create a chunker with the default size (1000) and overlap (200).
    pub fn default_config() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }

    /// The configured window size in characters.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The configured overlap in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into overlapping windows.
    ///
    /// Returns an empty vec for empty input. Otherwise the windows
    /// start at character offsets `0, step, 2*step, ...` where
    /// `step = size - overlap`; the last window is truncated so its
    /// end coincides with the end of the text, and no window starts
    /// at or past the end.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every character boundary, including the end.
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());
        let total_chars = bounds.len() - 1;

        let step = self.size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.size).min(total_chars);
            chunks.push(text[bounds[start]..bounds[end]].to_string());
            if end == total_chars {
                break;
            }
            start += step;
        }

        chunks
    }
}
