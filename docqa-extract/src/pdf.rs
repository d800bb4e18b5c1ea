//! PDF text extraction.

use std::path::Path;

use async_trait::async_trait;
use docqa_rag::{DocFormat, TextChunker};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::processor::DocumentProcessor;

/// Processor for PDF files, backed by `pdf-extract`.
#[derive(Debug)]
pub struct PdfProcessor {
    chunker: TextChunker,
}

impl PdfProcessor {
    /// Create a new PDF processor with the given chunker.
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }
}

#[async_trait]
impl DocumentProcessor for PdfProcessor {
    fn format(&self) -> DocFormat {
        DocFormat::Pdf
    }

    fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    async fn extract_text(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "extracting pdf");
        let bytes = tokio::fs::read(path).await?;

        // pdf-extract is CPU-bound; keep it off the async threads.
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Extraction {
                format: "PDF",
                message: e.to_string(),
            })
        })
        .await
        .map_err(|e| ExtractError::Extraction {
            format: "PDF",
            message: format!("task join error: {e}"),
        })??;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid single-page PDF containing the given text.
    fn minimal_pdf(phrase: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 100 700 Td ({phrase}) Tj ET\n");
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        let o1 = out.len();
        out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
        let o2 = out.len();
        out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
        let o3 = out.len();
        out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
        let o4 = out.len();
        out.extend_from_slice(
            format!("4 0 obj << /Length {} >> stream\n{stream}endstream endobj\n", stream.len())
                .as_bytes(),
        );
        let o5 = out.len();
        out.extend_from_slice(
            b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
        );
        let xref_start = out.len();
        out.extend_from_slice(b"xref\n0 6\n");
        out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
        for offset in [o1, o2, o3, o4, o5] {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
        out.extend_from_slice(format!("{xref_start}\n").as_bytes());
        out.extend_from_slice(b"%%EOF\n");
        out
    }

    #[tokio::test]
    async fn extracts_text_from_minimal_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.pdf");
        std::fs::write(&file, minimal_pdf("hello from pdf")).unwrap();

        let processor = PdfProcessor::new(TextChunker::default_config());
        let text = processor.extract_text(&file).await.unwrap();
        assert!(text.contains("hello from pdf"));
    }

    #[tokio::test]
    async fn invalid_pdf_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.pdf");
        std::fs::write(&file, b"this is not a pdf").unwrap();

        let processor = PdfProcessor::new(TextChunker::default_config());
        let err = processor.extract_text(&file).await.unwrap_err();
        assert!(matches!(err, ExtractError::Extraction { format: "PDF", .. }));
    }

    #[tokio::test]
    async fn process_file_tags_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.pdf");
        std::fs::write(&file, minimal_pdf("chunk tagging test")).unwrap();

        let processor = PdfProcessor::new(TextChunker::default_config());
        let chunks = processor.process_file(&file).await.unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].metadata.doc_type, DocFormat::Pdf);
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert!(chunks[0].metadata.source.ends_with("doc.pdf"));
        assert!(chunks[0].metadata.ocr_language.is_none());
    }
}
