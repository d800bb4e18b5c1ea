//! Data types for chunks, stored records, and retrieval results.

use serde::{Deserialize, Serialize};

/// The document formats the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocFormat {
    /// PDF documents (`.pdf`).
    Pdf,
    /// Word documents (`.docx`, `.doc`).
    Word,
    /// Plain text files (`.txt`).
    Text,
    /// Markdown files (`.md`, `.markdown`).
    Markdown,
    /// Images processed through OCR (`.png`, `.jpg`, ...).
    #[serde(rename = "image_ocr")]
    Image,
}

/// Every file extension the pipeline accepts, with its leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".pdf", ".docx", ".doc", ".txt", ".md", ".markdown", ".png", ".jpg", ".jpeg", ".tiff", ".bmp",
    ".gif",
];

impl DocFormat {
    /// Map a file extension to its format variant.
    ///
    /// Matching is case-insensitive and tolerates a leading dot.
    /// Returns `None` for unrecognized extensions.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Word),
            "txt" => Some(Self::Text),
            "md" | "markdown" => Some(Self::Markdown),
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" | "gif" => Some(Self::Image),
            _ => None,
        }
    }

    /// The tag stored in chunk metadata for this format.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Image => "image_ocr",
        }
    }
}

impl std::fmt::Display for DocFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Provenance metadata attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path of the source file the chunk was extracted from.
    pub source: String,
    /// Format of the source document.
    #[serde(rename = "type")]
    pub doc_type: DocFormat,
    /// 0-based position of the chunk within its document's chunk sequence.
    pub chunk_index: usize,
    /// OCR language hint, set only for image-derived chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_language: Option<String>,
}

/// A bounded substring of extracted document text with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, taken verbatim from the extracted document.
    pub content: String,
    /// Provenance metadata.
    pub metadata: ChunkMetadata,
}

/// A chunk committed to a collection, with its identifier and embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Identifier, unique within the collection.
    pub id: String,
    /// The stored text.
    pub content: String,
    /// Provenance metadata.
    pub metadata: ChunkMetadata,
    /// The embedding of `content`.
    pub embedding: Vec<f32>,
}

/// A stored record returned from a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The record identifier.
    pub id: String,
    /// The stored text.
    pub content: String,
    /// Provenance metadata.
    pub metadata: ChunkMetadata,
}

/// Point-in-time collection statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Number of stored records.
    pub count: usize,
    /// Collection name.
    pub name: String,
}
