//! DashScope embedding provider.
//!
//! Calls the DashScope OpenAI-compatible embeddings endpoint with
//! `reqwest`. Only available when the `dashscope` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, StoreError};

/// The DashScope OpenAI-compatible embeddings endpoint.
const DASHSCOPE_EMBEDDINGS_URL: &str =
    "https://dashscope.aliyuncs.com/compatible-mode/v1/embeddings";

/// The default embedding model.
const DEFAULT_MODEL: &str = "text-embedding-v3";

/// The default dimensionality for `text-embedding-v3`.
const DEFAULT_DIMENSIONS: usize = 1024;

/// An [`EmbeddingProvider`] backed by the DashScope embeddings API.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-v3`.
/// - `api_key` – from the constructor or the `DASHSCOPE_API_KEY`
///   environment variable.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::DashScopeEmbedder;
///
/// let embedder = DashScopeEmbedder::from_env()?;
/// let embedding = embedder.embed("你好, world").await?;
/// ```
pub struct DashScopeEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl DashScopeEmbedder {
    /// Create a new embedder with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Embedding`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(StoreError::Embedding {
                provider: "DashScope".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a new embedder using the `DASHSCOPE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DASHSCOPE_API_KEY").map_err(|_| StoreError::Embedding {
            provider: "DashScope".into(),
            message: "DASHSCOPE_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `text-embedding-v2`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the reported dimensionality.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }
}

// ── DashScope API request/response types ───────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for DashScopeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| StoreError::Embedding {
            provider: "DashScope".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "DashScope",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(DASHSCOPE_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "DashScope", error = %e, "request failed");
                StoreError::Embedding {
                    provider: "DashScope".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "DashScope", %status, "API error");
            return Err(StoreError::Embedding {
                provider: "DashScope".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "DashScope", error = %e, "failed to parse response");
            StoreError::Embedding {
                provider: "DashScope".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
