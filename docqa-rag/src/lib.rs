//! # docqa-rag
//!
//! Chunking, embeddings, and vector storage for the docqa pipeline.
//!
//! ## Overview
//!
//! - [`TextChunker`] — fixed-size/overlap splitter shared by every
//!   document format
//! - [`EmbeddingProvider`] — async embedding abstraction, with
//!   [`DashScopeEmbedder`] (HTTP) and [`HashEmbedder`] (offline,
//!   deterministic) implementations
//! - [`VectorBackend`] — collection storage abstraction, with
//!   [`InMemoryBackend`] and the persistent [`SqliteBackend`]
//! - [`DocumentStore`] — the add/search/delete/info contract the
//!   agents use
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docqa_rag::{DocumentStore, HashEmbedder, InMemoryBackend};
//!
//! # async fn example() -> docqa_rag::Result<()> {
//! let store = DocumentStore::open(
//!     Arc::new(InMemoryBackend::new()),
//!     Arc::new(HashEmbedder::new()),
//!     "documents",
//! )
//! .await?;
//! let results = store.search("what is in my notes?", 5).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod chunker;
#[cfg(feature = "dashscope")]
pub mod dashscope;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hash;
pub mod inmemory;
pub mod sqlite;
pub mod store;

pub use backend::{ScoredRecord, VectorBackend};
pub use chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextChunker};
#[cfg(feature = "dashscope")]
pub use dashscope::DashScopeEmbedder;
pub use document::{
    Chunk, ChunkMetadata, CollectionInfo, DocFormat, RetrievalResult, StoredRecord,
    SUPPORTED_EXTENSIONS,
};
pub use embedding::EmbeddingProvider;
pub use error::{Result, StoreError};
pub use hash::HashEmbedder;
pub use inmemory::InMemoryBackend;
pub use sqlite::SqliteBackend;
pub use store::{DEFAULT_COLLECTION, DocumentStore};
