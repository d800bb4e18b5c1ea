//! Error types for the `docqa-model` crate.

use thiserror::Error;

/// Errors that can occur when calling the chat model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The HTTP request failed before a response arrived.
    #[error("Model request failed: {0}")]
    Http(String),

    /// The call exceeded the configured timeout. Recoverable: retry or
    /// report to the user.
    #[error("Model call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The API answered with a non-success status.
    #[error("Model API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error detail from the response body.
        message: String,
    },

    /// The API answered but carried no usable payload.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Configuration problem (missing key, bad model name, ...).
    #[error("Model configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
