//! The document ingestion agent.
//!
//! Routes a file to its processor by extension, chunks it, and commits
//! the chunks to the store. Every error becomes a structured
//! [`IngestOutcome`], so batch ingestion is partial-failure tolerant
//! by construction.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use docqa_extract::{ExtractError, ProcessorRegistry};
use docqa_rag::{CollectionInfo, DocumentStore, StoreError};

use crate::outcome::IngestOutcome;

/// Ingests local files into the document store.
pub struct DocumentAgent {
    registry: ProcessorRegistry,
    store: Arc<DocumentStore>,
    /// The store backend assumes a single writer per collection;
    /// batch ingestion fans out extraction but serializes writes here.
    write_lock: Mutex<()>,
}

impl DocumentAgent {
    /// Create an agent over the given registry and store.
    pub fn new(registry: ProcessorRegistry, store: Arc<DocumentStore>) -> Self {
        Self {
            registry,
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Ingest a single file, returning a structured outcome.
    ///
    /// The file must exist and carry a supported extension; extraction
    /// and store failures are reported in the outcome, never raised.
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> IngestOutcome {
        let path = path.as_ref();
        let display_path = path.display().to_string();

        match self.try_ingest(path).await {
            Ok(outcome) => {
                info!(
                    file = %display_path,
                    chunks = outcome.chunk_count.unwrap_or(0),
                    "ingested file"
                );
                outcome
            }
            Err(err) => {
                warn!(file = %display_path, error = %err, "ingestion failed");
                let outcome = IngestOutcome::failure(&display_path, err.to_string());
                match err {
                    IngestFailure::Extract(ExtractError::UnsupportedFormat {
                        supported, ..
                    }) => outcome.with_supported_types(&supported),
                    _ => outcome,
                }
            }
        }
    }

    async fn try_ingest(&self, path: &Path) -> Result<IngestOutcome, IngestFailure> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(IngestFailure::Extract(ExtractError::NotFound(
                path.to_path_buf(),
            )));
        }

        let processor = self.registry.resolve(path)?;
        let format = processor.format();
        let chunks = processor.process_file(path).await?;
        let chunk_count = chunks.len();

        {
            let _guard = self.write_lock.lock().await;
            self.store.add_chunks(chunks).await?;
        }

        Ok(IngestOutcome::success(
            path.display().to_string(),
            format,
            chunk_count,
        ))
    }

    /// Ingest many files concurrently.
    ///
    /// Extraction fans out one task per file; the returned outcomes are
    /// in input order, and failures never abort the rest of the batch.
    pub async fn ingest_batch(&self, paths: &[impl AsRef<Path>]) -> Vec<IngestOutcome> {
        join_all(paths.iter().map(|p| self.ingest_file(p.as_ref()))).await
    }

    /// Record count and name of the backing collection.
    pub async fn store_info(&self) -> Result<CollectionInfo, StoreError> {
        self.store.info().await
    }

    /// Every file extension the agent accepts.
    pub fn supported_formats(&self) -> &'static [&'static str] {
        self.registry.supported_extensions()
    }
}

/// Internal error carrier so `try_ingest` can use `?` across the two
/// error domains before everything collapses into an outcome.
enum IngestFailure {
    Extract(ExtractError),
    Store(StoreError),
}

impl From<ExtractError> for IngestFailure {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

impl From<StoreError> for IngestFailure {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl std::fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract(e) => e.fmt(f),
            Self::Store(e) => e.fmt(f),
        }
    }
}
