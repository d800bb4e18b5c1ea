//! Markdown text extraction.
//!
//! Renders the markdown to HTML with `pulldown-cmark`, strips the
//! tags, and collapses whitespace runs, leaving flowing prose for the
//! chunker.

use std::path::Path;
use std::sync::OnceLock;

use async_trait::async_trait;
use docqa_rag::{DocFormat, TextChunker};
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

use crate::error::Result;
use crate::processor::DocumentProcessor;

/// Processor for Markdown files.
#[derive(Debug)]
pub struct MarkdownProcessor {
    chunker: TextChunker,
}

impl MarkdownProcessor {
    /// Create a new Markdown processor with the given chunker.
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Render markdown to HTML, drop the tags, collapse whitespace.
fn markdown_to_plain(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);

    let mut html_out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut html_out, parser);

    let stripped = tag_re().replace_all(&html_out, "");
    whitespace_re().replace_all(&stripped, " ").trim().to_string()
}

#[async_trait]
impl DocumentProcessor for MarkdownProcessor {
    fn format(&self) -> DocFormat {
        DocFormat::Markdown
    }

    fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    async fn extract_text(&self, path: &Path) -> Result<String> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(markdown_to_plain(&content))
    }
}
