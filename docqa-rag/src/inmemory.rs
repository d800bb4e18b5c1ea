//! In-memory vector backend using cosine similarity.
//!
//! [`InMemoryBackend`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. Nothing is persisted; it exists for
//! development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{ScoredRecord, VectorBackend, cosine_similarity, rank};
use crate::document::StoredRecord;
use crate::error::{Result, StoreError};

/// An in-memory vector backend using cosine similarity for search.
///
/// Collections are nested maps: collection name → record id → record.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, HashMap<String, StoredRecord>>>,
}

impl InMemoryBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn missing(name: &str) -> StoreError {
        StoreError::Backend {
            backend: "InMemory".to_string(),
            message: format!("collection '{name}' does not exist"),
        }
    }
}

#[async_trait]
impl VectorBackend for InMemoryBackend {
    async fn create_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::missing(name))
    }

    async fn upsert(&self, collection: &str, records: &[StoredRecord]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let collections = self.collections.read().await;
        let store = collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;

        let scored: Vec<ScoredRecord> = store
            .values()
            .map(|record| ScoredRecord {
                score: cosine_similarity(&record.embedding, embedding),
                record: record.clone(),
            })
            .collect();

        Ok(rank(scored, top_k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|store| store.len())
            .ok_or_else(|| Self::missing(collection))
    }
}
