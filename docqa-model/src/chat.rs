//! Chat messages, the model trait, and reply normalization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// The human side.
    User,
    /// The model side.
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who is speaking.
    pub role: Role,
    /// What they said.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A chat model collaborator.
///
/// The reply is an opaque JSON payload: providers differ in shape, so
/// callers pass it through [`response_text`] rather than assuming a
/// structure.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send an ordered sequence of messages, get the raw reply payload.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<Value>;
}

/// Fallback answer when the reply shape is unrecognized.
fn unknown_format_message(value: &Value) -> String {
    let keys = match value {
        Value::Object(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
        other => format!("<{}>", type_name(other)),
    };
    format!("Model reply was empty or in an unknown format (found: {keys})")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the answer text from an opaque model reply.
///
/// Tries, in order: the value itself as a string, then the fields
/// `text`, `content`, `message`, then the OpenAI-style
/// `choices[0].message.content`. Unknown shapes produce an explicit
/// fallback message naming the keys that were present — never a panic.
pub fn response_text(value: &Value) -> String {
    if let Some(s) = value.as_str() {
        return s.to_string();
    }

    for field in ["text", "content", "message"] {
        if let Some(s) = value.get(field).and_then(Value::as_str) {
            return s.to_string();
        }
    }

    if let Some(s) = value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return s.to_string();
    }

    unknown_format_message(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_passes_through() {
        assert_eq!(response_text(&json!("an answer")), "an answer");
    }

    #[test]
    fn text_field_wins_over_content() {
        let value = json!({"text": "from text", "content": "from content"});
        assert_eq!(response_text(&value), "from text");
    }

    #[test]
    fn content_and_message_fields_work() {
        assert_eq!(response_text(&json!({"content": "c"})), "c");
        assert_eq!(response_text(&json!({"message": "m"})), "m");
    }

    #[test]
    fn openai_choices_shape_works() {
        let value = json!({
            "choices": [{"message": {"role": "assistant", "content": "the answer"}}]
        });
        assert_eq!(response_text(&value), "the answer");
    }

    #[test]
    fn unknown_shape_names_the_keys() {
        let value = json!({"weird": 1, "shape": 2});
        let text = response_text(&value);
        assert!(text.contains("unknown format"));
        assert!(text.contains("weird"));
        assert!(text.contains("shape"));
    }

    #[test]
    fn null_reply_does_not_panic() {
        let text = response_text(&Value::Null);
        assert!(text.contains("unknown format"));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::system("s");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
    }
}
