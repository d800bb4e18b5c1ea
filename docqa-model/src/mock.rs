//! Mock chat model for tests and offline runs.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::chat::{ChatMessage, ChatModel};
use crate::error::{ModelError, Result};

/// A scripted [`ChatModel`].
///
/// Replies are served in order, repeating the last one once the script
/// runs out; with no script it answers with a fixed placeholder. Every
/// request's messages are recorded for inspection.
pub struct MockChatModel {
    replies: Vec<Value>,
    fail: bool,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    served: Mutex<usize>,
}

impl MockChatModel {
    /// A mock that always answers with a fixed placeholder reply.
    pub fn new() -> Self {
        Self {
            replies: Vec::new(),
            fail: false,
            requests: Mutex::new(Vec::new()),
            served: Mutex::new(0),
        }
    }

    /// A mock that serves the given replies in order.
    pub fn with_replies(replies: Vec<Value>) -> Self {
        Self {
            replies,
            ..Self::new()
        }
    }

    /// A mock whose every call fails with [`ModelError::Http`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Messages from every `generate` call, in call order.
    pub async fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().await.clone()
    }

    /// Number of `generate` calls made.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<Value> {
        self.requests.lock().await.push(messages.to_vec());

        if self.fail {
            return Err(ModelError::Http("mock model configured to fail".to_string()));
        }

        if self.replies.is_empty() {
            return Ok(Value::String("mock reply".to_string()));
        }

        let mut served = self.served.lock().await;
        let index = (*served).min(self.replies.len() - 1);
        *served += 1;
        Ok(self.replies[index].clone())
    }
}
