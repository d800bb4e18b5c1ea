//! Image OCR extraction.
//!
//! Runs the tesseract CLI through `rusty-tesseract` with a
//! configurable language hint. The default hint covers the corpus
//! here: simplified Chinese plus English.

use std::path::Path;

use async_trait::async_trait;
use docqa_rag::{Chunk, DocFormat, TextChunker};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::processor::{DocumentProcessor, chunks_for};

/// Default tesseract language hint.
pub const DEFAULT_OCR_LANGUAGE: &str = "chi_sim+eng";

/// Processor for image files, via OCR.
#[derive(Debug)]
pub struct ImageProcessor {
    chunker: TextChunker,
    language: String,
    grayscale: bool,
}

impl ImageProcessor {
    /// Create a new image processor with the given chunker and the
    /// default language hint.
    pub fn new(chunker: TextChunker) -> Self {
        Self {
            chunker,
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            grayscale: false,
        }
    }

    /// Set the tesseract language hint (e.g. `eng`, `chi_sim+eng`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Convert images to grayscale before OCR. Helps on noisy color
    /// scans.
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// The configured language hint.
    pub fn language(&self) -> &str {
        &self.language
    }
}

fn ocr_err(message: impl Into<String>) -> ExtractError {
    ExtractError::Extraction {
        format: "Image OCR",
        message: message.into(),
    }
}

/// Run tesseract over the image, optionally grayscale-converted first.
fn run_ocr(path: &Path, language: &str, grayscale: bool) -> Result<String> {
    let image = if grayscale {
        let decoded = image::open(path).map_err(|e| ocr_err(e.to_string()))?;
        let gray = image::DynamicImage::ImageLuma8(decoded.to_luma8());
        rusty_tesseract::Image::from_dynamic_image(&gray).map_err(|e| ocr_err(e.to_string()))?
    } else {
        rusty_tesseract::Image::from_path(path).map_err(|e| ocr_err(e.to_string()))?
    };

    let args = rusty_tesseract::Args {
        lang: language.to_string(),
        ..rusty_tesseract::Args::default()
    };

    rusty_tesseract::image_to_string(&image, &args)
        .map(|text| text.trim().to_string())
        .map_err(|e| ocr_err(e.to_string()))
}

#[async_trait]
impl DocumentProcessor for ImageProcessor {
    fn format(&self) -> DocFormat {
        DocFormat::Image
    }

    fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    async fn extract_text(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), language = %self.language, "running ocr");
        let path = path.to_path_buf();
        let language = self.language.clone();
        let grayscale = self.grayscale;
        tokio::task::spawn_blocking(move || run_ocr(&path, &language, grayscale))
            .await
            .map_err(|e| ocr_err(format!("task join error: {e}")))?
    }

    /// Chunks from OCR also record the language hint used.
    async fn process_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let text = self.extract_text(path).await?;
        Ok(chunks_for(self, path, &text, Some(&self.language)))
    }
}
