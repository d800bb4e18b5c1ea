//! The document processor trait shared by every format.

use std::path::Path;

use async_trait::async_trait;
use docqa_rag::{Chunk, ChunkMetadata, DocFormat, TextChunker};

use crate::error::Result;

/// A per-format document processor: extract raw text, then chunk it
/// with provenance metadata.
///
/// Implementations differ only in [`extract_text`](DocumentProcessor::extract_text);
/// the chunk-and-tag step is uniform and provided here. The image
/// processor overrides [`process_file`](DocumentProcessor::process_file)
/// to record its OCR language in the metadata.
#[async_trait]
pub trait DocumentProcessor: Send + Sync + std::fmt::Debug {
    /// The format this processor handles.
    fn format(&self) -> DocFormat;

    /// The chunker applied to extracted text.
    fn chunker(&self) -> &TextChunker;

    /// Extract the raw text of `path`.
    async fn extract_text(&self, path: &Path) -> Result<String>;

    /// Extract and chunk `path`, tagging each chunk with its source,
    /// format, and position.
    async fn process_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let text = self.extract_text(path).await?;
        Ok(chunks_for(self, path, &text, None))
    }
}

/// Chunk extracted text and attach metadata. Shared by every processor.
pub(crate) fn chunks_for<P: DocumentProcessor + ?Sized>(
    processor: &P,
    path: &Path,
    text: &str,
    ocr_language: Option<&str>,
) -> Vec<Chunk> {
    processor
        .chunker()
        .split(text)
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| Chunk {
            content,
            metadata: ChunkMetadata {
                source: path.display().to_string(),
                doc_type: processor.format(),
                chunk_index,
                ocr_language: ocr_language.map(str::to_string),
            },
        })
        .collect()
}
