//! # docqa-agent
//!
//! The orchestration layer of the docqa pipeline.
//!
//! - [`DocumentAgent`] — routes files to their format processor,
//!   chunks them, and commits the chunks to the store; batch ingestion
//!   is concurrent, order-preserving, and partial-failure tolerant.
//! - [`QaAgent`] — retrieves relevant chunks for a question, grounds a
//!   chat-model prompt with them, and appends cited sources; keeps an
//!   append-only conversation log with on-demand summarization.
//!
//! Both agents convert typed errors from the lower layers into
//! structured outcomes or answer text at their boundary; nothing
//! below an agent call escapes as a panic or a raw error.

pub mod document;
pub mod outcome;
pub mod qa;

pub use document::DocumentAgent;
pub use outcome::IngestOutcome;
pub use qa::{DEFAULT_TOP_K, NO_RELEVANT_INFO, QaAgent};
