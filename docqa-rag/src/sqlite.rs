//! SQLite-backed persistent vector backend.
//!
//! [`SqliteBackend`] stores collections in a single database file
//! inside a caller-chosen directory. Embeddings are kept as
//! little-endian `f32` BLOBs; similarity is computed in-process over
//! the collection's records at query time, which is plenty for a
//! single-user local corpus. Mutating calls return only after SQLite
//! has committed the write.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::backend::{ScoredRecord, VectorBackend, cosine_similarity, rank};
use crate::document::StoredRecord;
use crate::error::{Result, StoreError};

/// File name of the database inside the data directory.
const DB_FILE: &str = "docqa.db";

/// A [`VectorBackend`] persisted to a local SQLite database.
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open (or create) the backend inside `dir`.
    ///
    /// The directory is created if missing; the database file lives at
    /// `<dir>/docqa.db`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| StoreError::Backend {
            backend: "Sqlite".to_string(),
            message: format!("failed to create data directory {}: {e}", dir.display()),
        })?;

        let options = SqliteConnectOptions::new()
            .filename(dir.join(DB_FILE))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(Self::map_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS collections (name TEXT PRIMARY KEY)",
        )
        .execute(&pool)
        .await
        .map_err(Self::map_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS records (
                 collection TEXT NOT NULL,
                 id         TEXT NOT NULL,
                 content    TEXT NOT NULL,
                 metadata   TEXT NOT NULL,
                 embedding  BLOB NOT NULL,
                 PRIMARY KEY (collection, id)
             )",
        )
        .execute(&pool)
        .await
        .map_err(Self::map_err)?;

        debug!(dir = %dir.display(), "opened sqlite vector backend");
        Ok(Self { pool })
    }

    fn map_err(e: sqlx::Error) -> StoreError {
        StoreError::Backend {
            backend: "Sqlite".to_string(),
            message: e.to_string(),
        }
    }

    fn missing(name: &str) -> StoreError {
        StoreError::Backend {
            backend: "Sqlite".to_string(),
            message: format!("collection '{name}' does not exist"),
        }
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM collections WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_err)?;
        Ok(row.is_some())
    }
}

/// Encode an embedding as a little-endian `f32` BLOB.
fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode a little-endian `f32` BLOB back into an embedding.
fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[async_trait]
impl VectorBackend for SqliteBackend {
    async fn create_collection(&self, name: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO collections (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        if !self.collection_exists(name).await? {
            return Err(Self::missing(name));
        }

        let mut tx = self.pool.begin().await.map_err(Self::map_err)?;
        sqlx::query("DELETE FROM records WHERE collection = ?1")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?;
        sqlx::query("DELETE FROM collections WHERE name = ?1")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?;
        tx.commit().await.map_err(Self::map_err)?;

        debug!(collection = name, "deleted collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[StoredRecord]) -> Result<()> {
        if !self.collection_exists(collection).await? {
            return Err(Self::missing(collection));
        }
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Self::map_err)?;
        for record in records {
            let metadata =
                serde_json::to_string(&record.metadata).map_err(|e| StoreError::Backend {
                    backend: "Sqlite".to_string(),
                    message: format!("failed to serialize metadata: {e}"),
                })?;
            sqlx::query(
                "INSERT OR REPLACE INTO records (collection, id, content, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(collection)
            .bind(&record.id)
            .bind(&record.content)
            .bind(metadata)
            .bind(encode_embedding(&record.embedding))
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?;
        }
        tx.commit().await.map_err(Self::map_err)?;

        debug!(collection, count = records.len(), "upserted records");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        if !self.collection_exists(collection).await? {
            return Err(Self::missing(collection));
        }

        let rows = sqlx::query(
            "SELECT id, content, metadata, embedding FROM records WHERE collection = ?1",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err)?;

        let mut scored = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id").map_err(Self::map_err)?;
            let content: String = row.try_get("content").map_err(Self::map_err)?;
            let metadata_json: String = row.try_get("metadata").map_err(Self::map_err)?;
            let blob: Vec<u8> = row.try_get("embedding").map_err(Self::map_err)?;

            let metadata =
                serde_json::from_str(&metadata_json).map_err(|e| StoreError::Backend {
                    backend: "Sqlite".to_string(),
                    message: format!("corrupt metadata for record '{id}': {e}"),
                })?;
            let record_embedding = decode_embedding(&blob);

            scored.push(ScoredRecord {
                score: cosine_similarity(&record_embedding, embedding),
                record: StoredRecord {
                    id,
                    content,
                    metadata,
                    embedding: record_embedding,
                },
            });
        }

        Ok(rank(scored, top_k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        if !self.collection_exists(collection).await? {
            return Err(Self::missing(collection));
        }

        let row = sqlx::query("SELECT COUNT(*) AS n FROM records WHERE collection = ?1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_err)?;
        let n: i64 = row.try_get("n").map_err(Self::map_err)?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ChunkMetadata, DocFormat};

    fn record(id: &str, embedding: Vec<f32>) -> StoredRecord {
        StoredRecord {
            id: id.to_string(),
            content: format!("content of {id}"),
            metadata: ChunkMetadata {
                source: "doc.pdf".into(),
                doc_type: DocFormat::Pdf,
                chunk_index: 3,
                ocr_language: None,
            },
            embedding,
        }
    }

    #[test]
    fn embedding_blob_round_trips() {
        let embedding = vec![0.25f32, -1.5, 3.75, 0.0];
        assert_eq!(decode_embedding(&encode_embedding(&embedding)), embedding);
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let backend = SqliteBackend::open(dir.path()).await.unwrap();
            backend.create_collection("docs").await.unwrap();
            backend
                .upsert("docs", &[record("a", vec![1.0, 0.0])])
                .await
                .unwrap();
        }

        let backend = SqliteBackend::open(dir.path()).await.unwrap();
        assert_eq!(backend.count("docs").await.unwrap(), 1);
        let results = backend.search("docs", &[1.0, 0.0], 5).await.unwrap();
        assert_eq!(results[0].record.id, "a");
        assert_eq!(results[0].record.metadata.doc_type, DocFormat::Pdf);
        assert_eq!(results[0].record.metadata.chunk_index, 3);
    }

    #[tokio::test]
    async fn deleted_collection_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(dir.path()).await.unwrap();
        backend.create_collection("docs").await.unwrap();
        backend
            .upsert("docs", &[record("a", vec![1.0])])
            .await
            .unwrap();

        backend.delete_collection("docs").await.unwrap();
        assert!(backend.count("docs").await.is_err());
        assert!(backend.search("docs", &[1.0], 5).await.is_err());
    }

    #[tokio::test]
    async fn upsert_same_id_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(dir.path()).await.unwrap();
        backend.create_collection("docs").await.unwrap();
        backend
            .upsert("docs", &[record("a", vec![1.0])])
            .await
            .unwrap();
        backend
            .upsert("docs", &[record("a", vec![0.5])])
            .await
            .unwrap();
        assert_eq!(backend.count("docs").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(dir.path()).await.unwrap();
        backend.create_collection("left").await.unwrap();
        backend.create_collection("right").await.unwrap();
        backend
            .upsert("left", &[record("a", vec![1.0])])
            .await
            .unwrap();

        assert_eq!(backend.count("left").await.unwrap(), 1);
        assert_eq!(backend.count("right").await.unwrap(), 0);
    }
}
