//! Word (OOXML) text extraction.
//!
//! Reads `word/document.xml` out of the `.docx` ZIP container and
//! streams its XML, collecting `w:t` text runs and a newline per
//! paragraph. Legacy binary `.doc` files are not a ZIP container and
//! surface as extraction errors.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use docqa_rag::{DocFormat, TextChunker};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::processor::DocumentProcessor;

/// Maximum decompressed bytes to read from the document part
/// (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Processor for Word documents.
#[derive(Debug)]
pub struct WordProcessor {
    chunker: TextChunker,
}

impl WordProcessor {
    /// Create a new Word processor with the given chunker.
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }
}

fn word_err(message: impl Into<String>) -> ExtractError {
    ExtractError::Extraction {
        format: "Word",
        message: message.into(),
    }
}

/// Pull paragraph text out of `word/document.xml` bytes.
fn extract_document_xml(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| word_err(e.to_string()))?;

    let mut doc_xml = Vec::new();
    {
        let entry = archive
            .by_name("word/document.xml")
            .map_err(|_| word_err("word/document.xml not found"))?;
        entry
            .take(MAX_XML_ENTRY_BYTES)
            .read_to_end(&mut doc_xml)
            .map_err(|e| word_err(e.to_string()))?;
        if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
            return Err(word_err("word/document.xml exceeds size limit"));
        }
    }

    paragraphs_from_xml(&doc_xml)
}

/// Walk the XML events: text inside `w:t` accumulates, each closed
/// `w:p` ends a line.
fn paragraphs_from_xml(xml: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(quick_xml::events::Event::Text(te)) if in_text => {
                out.push_str(te.unescape().unwrap_or_default().as_ref());
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(word_err(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(out.trim().to_string())
}

#[async_trait]
impl DocumentProcessor for WordProcessor {
    fn format(&self) -> DocFormat {
        DocFormat::Word
    }

    fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    async fn extract_text(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "extracting word document");
        let bytes = tokio::fs::read(path).await?;
        tokio::task::spawn_blocking(move || extract_document_xml(&bytes))
            .await
            .map_err(|e| word_err(format!("task join error: {e}")))?
    }
}
