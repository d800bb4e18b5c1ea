//! # docqa-model
//!
//! The chat-model boundary for the docqa pipeline.
//!
//! The pipeline treats the language model as a black box: it sends an
//! ordered sequence of role-tagged [`ChatMessage`]s and receives an
//! opaque JSON payload, which [`response_text`] normalizes into answer
//! text by trying known field names in a fixed priority order.
//!
//! Implementations:
//!
//! - [`DashScopeChatModel`] — DashScope (qwen) over its
//!   OpenAI-compatible endpoint, with a caller-supplied timeout
//! - [`MockChatModel`] — scripted replies for tests and offline runs

pub mod chat;
pub mod dashscope;
pub mod error;
pub mod mock;

pub use chat::{ChatMessage, ChatModel, Role, response_text};
pub use dashscope::DashScopeChatModel;
pub use error::{ModelError, Result};
pub use mock::MockChatModel;
