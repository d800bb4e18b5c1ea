//! Plain text extraction with encoding detection.
//!
//! Files are read as bytes and decoded with a detected encoding
//! (`chardetng`). If the detected encoding produces replacement
//! characters, a fixed list of encodings common in this corpus is
//! tried in order: UTF-8, GBK (which also covers the gb2312 label),
//! GB18030, Windows-1252.

use std::path::Path;

use async_trait::async_trait;
use chardetng::EncodingDetector;
use docqa_rag::{DocFormat, TextChunker};
use encoding_rs::{Encoding, GB18030, GBK, UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::processor::DocumentProcessor;

/// Fallback encodings, tried in order when detection fails.
const FALLBACK_ENCODINGS: &[&Encoding] = &[UTF_8, GBK, GB18030, WINDOWS_1252];

/// Processor for plain text files.
#[derive(Debug)]
pub struct TextProcessor {
    chunker: TextChunker,
}

impl TextProcessor {
    /// Create a new text processor with the given chunker.
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }
}

/// Decode raw bytes, preferring the detected encoding.
fn decode_bytes(bytes: &[u8]) -> Result<String> {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let detected = detector.guess(None, true);

    let (text, _, had_errors) = detected.decode(bytes);
    if !had_errors {
        debug!(encoding = detected.name(), "decoded with detected encoding");
        return Ok(text.into_owned());
    }

    for encoding in FALLBACK_ENCODINGS {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            debug!(encoding = encoding.name(), "decoded with fallback encoding");
            return Ok(text.into_owned());
        }
    }

    Err(ExtractError::Extraction {
        format: "Text",
        message: "could not decode file with any supported encoding".to_string(),
    })
}

#[async_trait]
impl DocumentProcessor for TextProcessor {
    fn format(&self) -> DocFormat {
        DocFormat::Text
    }

    fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    async fn extract_text(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        decode_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "plain utf-8 text, 含中文").unwrap();

        let processor = TextProcessor::new(TextChunker::default_config());
        let text = processor.extract_text(&file).await.unwrap();
        assert_eq!(text, "plain utf-8 text, 含中文");
    }

    #[tokio::test]
    async fn decodes_gbk_bytes() {
        let original = "这是一个用于测试编码检测的中文文本文件。\
                        它包含足够多的汉字，编码检测器可以据此判断出正确的字符集。\
                        文档问答系统需要正确读取这样的文件。";
        let (gbk_bytes, _, had_errors) = GBK.encode(original);
        assert!(!had_errors);

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gbk.txt");
        std::fs::write(&file, &gbk_bytes).unwrap();

        let processor = TextProcessor::new(TextChunker::default_config());
        let text = processor.extract_text(&file).await.unwrap();
        assert_eq!(text, original);
    }

    #[tokio::test]
    async fn decodes_latin1_style_bytes() {
        // "café" in Windows-1252
        let bytes: &[u8] = &[b'c', b'a', b'f', 0xE9];
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin.txt");
        std::fs::write(&file, bytes).unwrap();

        let processor = TextProcessor::new(TextChunker::default_config());
        let text = processor.extract_text(&file).await.unwrap();
        assert!(text.starts_with("caf"));
        assert_eq!(text.chars().count(), 4);
    }

    #[tokio::test]
    async fn empty_file_yields_empty_text_and_no_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.txt");
        std::fs::write(&file, "").unwrap();

        let processor = TextProcessor::new(TextChunker::default_config());
        assert_eq!(processor.extract_text(&file).await.unwrap(), "");
        assert!(processor.process_file(&file).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let processor = TextProcessor::new(TextChunker::default_config());
        let err = processor
            .extract_text(Path::new("/nonexistent/notes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
