//! # docqa-extract
//!
//! Per-format text extraction for the docqa pipeline.
//!
//! Each supported format gets a [`DocumentProcessor`]: extract the raw
//! text of a file, then split it through the shared
//! [`TextChunker`](docqa_rag::TextChunker) into provenance-tagged
//! chunks. [`ProcessorRegistry`] dispatches a file to its processor by
//! extension.
//!
//! | Format | Extensions | Backed by |
//! |--------|------------|-----------|
//! | PDF | `.pdf` | `pdf-extract` |
//! | Word | `.docx`, `.doc` | `zip` + `quick-xml` |
//! | Text | `.txt` | `chardetng` + `encoding_rs` |
//! | Markdown | `.md`, `.markdown` | `pulldown-cmark` |
//! | Image OCR | `.png`, `.jpg`, `.jpeg`, `.tiff`, `.bmp`, `.gif` | `rusty-tesseract` |

pub mod error;
pub mod image;
pub mod markdown;
pub mod pdf;
pub mod processor;
pub mod registry;
pub mod text;
pub mod word;

pub use error::{ExtractError, Result};
pub use image::{DEFAULT_OCR_LANGUAGE, ImageProcessor};
pub use markdown::MarkdownProcessor;
pub use pdf::PdfProcessor;
pub use processor::DocumentProcessor;
pub use registry::ProcessorRegistry;
pub use text::TextProcessor;
pub use word::WordProcessor;
