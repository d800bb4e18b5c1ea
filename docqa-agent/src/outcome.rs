//! Structured per-file ingestion outcomes.

use serde::{Deserialize, Serialize};

use docqa_rag::DocFormat;

/// What happened when one file was ingested.
///
/// Failures are data, not errors: batch ingestion returns one outcome
/// per input path regardless of how many failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Whether the file made it into the store.
    pub success: bool,
    /// The input path as given.
    pub file_path: String,
    /// The resolved document format, when dispatch got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<DocFormat>,
    /// Number of chunks stored, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
    /// Human-readable summary, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// What went wrong, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The supported extension list, on unsupported-format failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_types: Option<Vec<String>>,
}

impl IngestOutcome {
    /// A successful ingestion of `chunk_count` chunks.
    pub fn success(file_path: impl Into<String>, format: DocFormat, chunk_count: usize) -> Self {
        let file_path = file_path.into();
        let message =
            format!("Ingested {file_path}: {chunk_count} chunk(s) stored as {format}");
        Self {
            success: true,
            file_path,
            format: Some(format),
            chunk_count: Some(chunk_count),
            message: Some(message),
            error: None,
            supported_types: None,
        }
    }

    /// A failed ingestion.
    pub fn failure(file_path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            file_path: file_path.into(),
            format: None,
            chunk_count: None,
            message: None,
            error: Some(error.into()),
            supported_types: None,
        }
    }

    /// Attach the supported extension list (unsupported-format failures).
    pub fn with_supported_types(mut self, supported: &[&str]) -> Self {
        self.supported_types = Some(supported.iter().map(|s| s.to_string()).collect());
        self
    }
}
