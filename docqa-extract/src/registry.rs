//! Extension-based processor dispatch.

use std::path::Path;

use docqa_rag::{DocFormat, SUPPORTED_EXTENSIONS, TextChunker};

use crate::error::{ExtractError, Result};
use crate::image::ImageProcessor;
use crate::markdown::MarkdownProcessor;
use crate::pdf::PdfProcessor;
use crate::processor::DocumentProcessor;
use crate::text::TextProcessor;
use crate::word::WordProcessor;

/// One processor per document format, selected by file extension.
pub struct ProcessorRegistry {
    pdf: PdfProcessor,
    word: WordProcessor,
    text: TextProcessor,
    markdown: MarkdownProcessor,
    image: ImageProcessor,
}

impl ProcessorRegistry {
    /// Build a registry whose processors share one chunker configuration.
    pub fn new(chunker: TextChunker) -> Self {
        Self {
            pdf: PdfProcessor::new(chunker.clone()),
            word: WordProcessor::new(chunker.clone()),
            text: TextProcessor::new(chunker.clone()),
            markdown: MarkdownProcessor::new(chunker.clone()),
            image: ImageProcessor::new(chunker),
        }
    }

    /// Build a registry with the default chunker (size 1000, overlap 200).
    pub fn with_defaults() -> Self {
        Self::new(TextChunker::default_config())
    }

    /// Set the OCR language hint on the image processor.
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.image = self.image.with_language(language);
        self
    }

    /// The processor for a given format.
    pub fn for_format(&self, format: DocFormat) -> &dyn DocumentProcessor {
        match format {
            DocFormat::Pdf => &self.pdf,
            DocFormat::Word => &self.word,
            DocFormat::Text => &self.text,
            DocFormat::Markdown => &self.markdown,
            DocFormat::Image => &self.image,
        }
    }

    /// Resolve a path to its processor by extension.
    ///
    /// # Errors
    ///
    /// [`ExtractError::UnsupportedFormat`] (listing every supported
    /// extension) when the extension is missing or unrecognized.
    pub fn resolve(&self, path: &Path) -> Result<&dyn DocumentProcessor> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match DocFormat::from_extension(extension) {
            Some(format) => Ok(self.for_format(format)),
            None => Err(ExtractError::UnsupportedFormat {
                extension: format!(".{}", extension.to_ascii_lowercase()),
                supported: SUPPORTED_EXTENSIONS.to_vec(),
            }),
        }
    }

    /// Every file extension the registry accepts.
    pub fn supported_extensions(&self) -> &'static [&'static str] {
        SUPPORTED_EXTENSIONS
    }
}
