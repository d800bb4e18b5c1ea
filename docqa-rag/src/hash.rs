//! Deterministic offline embedder.
//!
//! [`HashEmbedder`] maps character trigrams into a fixed number of
//! hash buckets and L2-normalizes the result. It needs no network or
//! model weights and always produces the same vector for the same
//! text, which makes it suitable for tests and offline smoke runs.
//! Texts sharing trigrams get correlated vectors, so similarity
//! ranking behaves sensibly on real prose, if crudely.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Feature-hashed trigram embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a new embedder with the default dimension (256).
    pub fn new() -> Self {
        Self { dimension: 256 }
    }

    /// Create an embedder with a specific dimension.
    pub fn with_dimensions(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, feature: &[char]) -> usize {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        let chars: Vec<char> = text.chars().collect();

        if chars.is_empty() {
            return Ok(vector);
        }

        if chars.len() < 3 {
            vector[self.bucket(&chars)] += 1.0;
        } else {
            for trigram in chars.windows(3) {
                vector[self.bucket(trigram)] += 1.0;
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_same_vector() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("retrieval augmented generation").await.unwrap();
        let b = embedder.embed("retrieval augmented generation").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn vectors_are_normalized() {
        let embedder = HashEmbedder::new();
        let v = embedder.embed("some document text").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new();
        let v = embedder.embed("").await.unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
        assert_eq!(v.len(), embedder.dimensions());
    }

    #[tokio::test]
    async fn related_texts_are_closer_than_unrelated() {
        let embedder = HashEmbedder::new();
        let base = embedder.embed("the cat sat on the mat").await.unwrap();
        let near = embedder.embed("the cat sat on the hat").await.unwrap();
        let far = embedder.embed("量子力学的基本原理").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 {
            a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
        };
        assert!(dot(&base, &near) > dot(&base, &far));
    }
}
