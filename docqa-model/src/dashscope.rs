//! DashScope chat model client.
//!
//! Talks to the DashScope OpenAI-compatible chat-completions endpoint
//! with `reqwest`. The caller supplies a timeout; expiry surfaces as
//! the recoverable [`ModelError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::chat::{ChatMessage, ChatModel};
use crate::error::{ModelError, Result};

/// The DashScope OpenAI-compatible chat completions endpoint.
const DASHSCOPE_CHAT_URL: &str =
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";

/// The default chat model.
const DEFAULT_MODEL: &str = "qwen-max";

/// The default call timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`ChatModel`] backed by the DashScope API.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use docqa_model::{ChatMessage, ChatModel, DashScopeChatModel};
///
/// let model = DashScopeChatModel::from_env()?.with_timeout(Duration::from_secs(30));
/// let reply = model.generate(&[ChatMessage::user("hello")]).await?;
/// ```
pub struct DashScopeChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl DashScopeChatModel {
    /// Create a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create a new client using the `DASHSCOPE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DASHSCOPE_API_KEY").map_err(|_| {
            ModelError::Config("DASHSCOPE_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `qwen-plus`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound each call by `timeout`; expiry becomes [`ModelError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[async_trait]
impl ChatModel for DashScopeChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<Value> {
        debug!(
            model = %self.model,
            message_count = messages.len(),
            "calling chat model"
        );

        let request_body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(DASHSCOPE_CHAT_URL)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(timeout = ?self.timeout, "chat model call timed out");
                    ModelError::Timeout(self.timeout)
                } else {
                    error!(error = %e, "chat model request failed");
                    ModelError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(body);
            error!(status, "chat model API error");
            return Err(ModelError::Api { status, message });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ModelError::Http(format!("failed to parse response: {e}")))?;

        if payload.is_null() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(payload)
    }
}
