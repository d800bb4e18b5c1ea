//! The document store: a named collection with add/search/delete/info.
//!
//! [`DocumentStore`] composes an [`EmbeddingProvider`] and a
//! [`VectorBackend`] behind the contract the agents program against:
//! texts and metadata go in, ranked [`RetrievalResult`]s come out.
//! The store owns its collection's lifecycle — after
//! [`delete_collection`](DocumentStore::delete_collection) the handle
//! is dead and every operation fails until a new store is opened.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::VectorBackend;
use crate::document::{Chunk, ChunkMetadata, CollectionInfo, RetrievalResult, StoredRecord};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, StoreError};

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "documents";

/// An embedding-backed, named collection of document chunks.
pub struct DocumentStore {
    backend: Arc<dyn VectorBackend>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
    deleted: AtomicBool,
}

impl DocumentStore {
    /// Open a store handle, creating the collection if it does not exist.
    pub async fn open(
        backend: Arc<dyn VectorBackend>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Result<Self> {
        let collection = collection.into();
        backend.create_collection(&collection).await?;
        Ok(Self {
            backend,
            embedder,
            collection,
            deleted: AtomicBool::new(false),
        })
    }

    /// The collection name this handle operates on.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn ensure_live(&self) -> Result<()> {
        if self.deleted.load(Ordering::Acquire) {
            return Err(StoreError::CollectionDeleted(self.collection.clone()));
        }
        Ok(())
    }

    /// Add texts with their metadata to the collection.
    ///
    /// When `ids` is `None` a fresh UUID is generated per text. Returns
    /// the ids of the stored records, in input order.
    ///
    /// # Errors
    ///
    /// [`StoreError::LengthMismatch`] if `metadatas` (or `ids`, when
    /// supplied) differs in length from `texts`;
    /// [`StoreError::CollectionDeleted`] on a dead handle.
    pub async fn add(
        &self,
        texts: Vec<String>,
        metadatas: Vec<ChunkMetadata>,
        ids: Option<Vec<String>>,
    ) -> Result<Vec<String>> {
        self.ensure_live()?;

        if metadatas.len() != texts.len() {
            return Err(StoreError::LengthMismatch {
                texts: texts.len(),
                other: metadatas.len(),
                what: "metadatas",
            });
        }
        if let Some(ids) = &ids {
            if ids.len() != texts.len() {
                return Err(StoreError::LengthMismatch {
                    texts: texts.len(),
                    other: ids.len(),
                    what: "ids",
                });
            }
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids.unwrap_or_else(|| {
            texts.iter().map(|_| Uuid::new_v4().to_string()).collect()
        });

        let embeddings = {
            let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            self.embedder.embed_batch(&text_refs).await?
        };

        let records: Vec<StoredRecord> = ids
            .iter()
            .zip(texts)
            .zip(metadatas)
            .zip(embeddings)
            .map(|(((id, content), metadata), embedding)| StoredRecord {
                id: id.clone(),
                content,
                metadata,
                embedding,
            })
            .collect();

        self.backend.upsert(&self.collection, &records).await?;

        info!(
            collection = %self.collection,
            count = records.len(),
            "stored records"
        );
        Ok(ids)
    }

    /// Add chunks produced by a document processor.
    pub async fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<Vec<String>> {
        let (texts, metadatas) = chunks
            .into_iter()
            .map(|c| (c.content, c.metadata))
            .unzip();
        self.add(texts, metadatas, None).await
    }

    /// Search the collection for the `top_k` records most similar to `query`.
    ///
    /// Returns fewer than `top_k` results when the collection holds
    /// fewer records, and an empty vec on an empty collection.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>> {
        self.ensure_live()?;

        if top_k == 0 {
            return Err(StoreError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }

        let query_embedding = self.embedder.embed(query).await?;
        let scored = self
            .backend
            .search(&self.collection, &query_embedding, top_k)
            .await?;

        debug!(
            collection = %self.collection,
            result_count = scored.len(),
            "search completed"
        );

        Ok(scored
            .into_iter()
            .map(|s| RetrievalResult {
                id: s.record.id,
                content: s.record.content,
                metadata: s.record.metadata,
            })
            .collect())
    }

    /// Irreversibly destroy the collection and poison this handle.
    ///
    /// Subsequent operations on the handle fail with
    /// [`StoreError::CollectionDeleted`] until a new store is opened.
    pub async fn delete_collection(&self) -> Result<()> {
        self.ensure_live()?;
        self.backend.delete_collection(&self.collection).await?;
        self.deleted.store(true, Ordering::Release);
        info!(collection = %self.collection, "deleted collection");
        Ok(())
    }

    /// Point-in-time record count and collection name.
    pub async fn info(&self) -> Result<CollectionInfo> {
        self.ensure_live()?;
        let count = self.backend.count(&self.collection).await?;
        Ok(CollectionInfo {
            count,
            name: self.collection.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocFormat;
    use crate::hash::HashEmbedder;
    use crate::inmemory::InMemoryBackend;

    fn meta(source: &str, index: usize) -> ChunkMetadata {
        ChunkMetadata {
            source: source.to_string(),
            doc_type: DocFormat::Text,
            chunk_index: index,
            ocr_language: None,
        }
    }

    async fn open_store() -> DocumentStore {
        DocumentStore::open(
            Arc::new(InMemoryBackend::new()),
            Arc::new(HashEmbedder::new()),
            "test",
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn add_generates_unique_ids() {
        let store = open_store().await;
        let ids = store
            .add(
                vec!["alpha".into(), "beta".into()],
                vec![meta("a.txt", 0), meta("a.txt", 1)],
                None,
            )
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(store.info().await.unwrap().count, 2);
    }

    #[tokio::test]
    async fn add_accepts_caller_ids() {
        let store = open_store().await;
        let ids = store
            .add(
                vec!["alpha".into()],
                vec![meta("a.txt", 0)],
                Some(vec!["fixed-id".into()]),
            )
            .await
            .unwrap();
        assert_eq!(ids, vec!["fixed-id".to_string()]);
    }

    #[tokio::test]
    async fn add_rejects_length_mismatch() {
        let store = open_store().await;
        let err = store
            .add(vec!["alpha".into(), "beta".into()], vec![meta("a.txt", 0)], None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LengthMismatch { .. }));

        let err = store
            .add(
                vec!["alpha".into()],
                vec![meta("a.txt", 0)],
                Some(vec!["x".into(), "y".into()]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LengthMismatch { .. }));
    }

    #[tokio::test]
    async fn reingestion_doubles_count() {
        let store = open_store().await;
        let texts = vec!["same text".to_string(); 3];
        let metas = vec![meta("a.txt", 0), meta("a.txt", 1), meta("a.txt", 2)];
        store.add(texts.clone(), metas.clone(), None).await.unwrap();
        store.add(texts, metas, None).await.unwrap();
        assert_eq!(store.info().await.unwrap().count, 6);
    }

    #[tokio::test]
    async fn search_empty_collection_returns_empty() {
        let store = open_store().await;
        let results = store.search("anything", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_returns_at_most_top_k() {
        let store = open_store().await;
        let texts: Vec<String> = (0..10).map(|i| format!("document number {i}")).collect();
        let metas: Vec<ChunkMetadata> = (0..10).map(|i| meta("a.txt", i)).collect();
        store.add(texts, metas, None).await.unwrap();

        assert_eq!(store.search("document", 3).await.unwrap().len(), 3);
        assert_eq!(store.search("document", 50).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn search_rejects_zero_top_k() {
        let store = open_store().await;
        assert!(matches!(
            store.search("q", 0).await.unwrap_err(),
            StoreError::Config(_)
        ));
    }

    #[tokio::test]
    async fn deleted_handle_rejects_everything() {
        let store = open_store().await;
        store
            .add(vec!["alpha".into()], vec![meta("a.txt", 0)], None)
            .await
            .unwrap();
        store.delete_collection().await.unwrap();

        assert!(matches!(
            store.info().await.unwrap_err(),
            StoreError::CollectionDeleted(_)
        ));
        assert!(matches!(
            store.search("alpha", 5).await.unwrap_err(),
            StoreError::CollectionDeleted(_)
        ));
        assert!(matches!(
            store
                .add(vec!["beta".into()], vec![meta("b.txt", 0)], None)
                .await
                .unwrap_err(),
            StoreError::CollectionDeleted(_)
        ));
        assert!(matches!(
            store.delete_collection().await.unwrap_err(),
            StoreError::CollectionDeleted(_)
        ));
    }

    #[tokio::test]
    async fn fresh_handle_works_after_delete() {
        let backend = Arc::new(InMemoryBackend::new());
        let embedder = Arc::new(HashEmbedder::new());
        let store = DocumentStore::open(backend.clone(), embedder.clone(), "docs")
            .await
            .unwrap();
        store.delete_collection().await.unwrap();

        let reopened = DocumentStore::open(backend, embedder, "docs").await.unwrap();
        assert_eq!(reopened.info().await.unwrap().count, 0);
    }
}
