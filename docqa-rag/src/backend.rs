//! Vector backend trait for storing and searching embedded records.

use async_trait::async_trait;

use crate::document::StoredRecord;
use crate::error::Result;

/// A [`StoredRecord`] paired with its similarity score for one query.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    /// The stored record.
    pub record: StoredRecord,
    /// Similarity to the query embedding (higher is more similar).
    pub score: f32,
}

/// A storage backend for embedded records with similarity search.
///
/// Implementations manage named collections. The collection is the
/// only deletion granularity: records are removed by deleting the
/// whole collection, never individually.
///
/// Backends are not required to tolerate concurrent mutation of one
/// collection from multiple callers; the ingestion layer serializes
/// writes.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str) -> Result<()>;

    /// Delete a named collection and all its records.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert records into a collection. Records must have embeddings set.
    ///
    /// The call returns only after the backend has durably accepted
    /// the write.
    async fn upsert(&self, collection: &str, records: &[StoredRecord]) -> Result<()>;

    /// Search for the `top_k` records most similar to the given embedding.
    ///
    /// Results are ordered by descending score; ties break by ascending
    /// record id so that identical collection state and query always
    /// produce the same order.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>>;

    /// Number of records currently in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Sort scored records by descending score, ties by ascending id, and
/// truncate to `top_k`.
pub(crate) fn rank(mut scored: Vec<ScoredRecord>, top_k: usize) -> Vec<ScoredRecord> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });
    scored.truncate(top_k);
    scored
}
