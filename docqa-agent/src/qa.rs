//! The question-answering agent.
//!
//! Retrieves the chunks closest to a question, builds a grounding
//! prompt from them, delegates answer synthesis to the chat model, and
//! appends the cited sources. Model failures become user-visible
//! apologies — a Q&A session never crashes on a bad model call.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use docqa_model::{ChatMessage, ChatModel, response_text};
use docqa_rag::{DocumentStore, RetrievalResult};

/// Default number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum characters of one excerpt inside the grounding prompt.
const EXCERPT_LIMIT: usize = 800;

/// How many trailing history messages feed a conversation summary.
const SUMMARY_CONTEXT_MESSAGES: usize = 10;

/// The fixed answer when retrieval comes back empty.
pub const NO_RELEVANT_INFO: &str = "I could not find relevant information in the ingested \
     documents. Make sure the relevant files have been ingested, or try rephrasing the question.";

/// The fixed answer when the conversation log is empty.
const NO_CONVERSATION: &str = "There is no conversation to summarize yet.";

const SYSTEM_PROMPT: &str = "You are a document question-answering assistant. Answer strictly \
     from the document excerpts provided in the conversation. If the excerpts do not contain \
     the answer, say so explicitly. Be accurate and concise, and quote the relevant passages \
     when useful.";

const SUMMARY_PROMPT: &str = "Produce a concise summary of the following conversation: the \
     main topics discussed, the key questions and answers, and any conclusions reached.";

/// Answers questions over the ingested corpus.
pub struct QaAgent {
    store: Arc<DocumentStore>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
    history: Mutex<Vec<ChatMessage>>,
}

impl QaAgent {
    /// Create an agent over the given store and model.
    pub fn new(store: Arc<DocumentStore>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            store,
            model,
            top_k: DEFAULT_TOP_K,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Override how many chunks are retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Answer a question from the ingested documents.
    ///
    /// The question and the final answer are appended to the
    /// conversation log. This never returns an error: retrieval and
    /// model failures surface as answer text.
    pub async fn ask(&self, question: &str) -> String {
        let answer = self.answer(question).await;

        let mut history = self.history.lock().await;
        history.push(ChatMessage::user(question));
        history.push(ChatMessage::assistant(&answer));

        answer
    }

    async fn answer(&self, question: &str) -> String {
        let results = match self.store.search(question, self.top_k).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "retrieval failed");
                return format!("Sorry, something went wrong while searching the documents: {err}");
            }
        };

        if results.is_empty() {
            info!("no relevant chunks for question");
            return NO_RELEVANT_INFO.to_string();
        }

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(grounding_prompt(question, &results)),
        ];

        let answer = match self.model.generate(&messages).await {
            Ok(reply) => response_text(&reply),
            Err(err) => {
                warn!(error = %err, "chat model call failed");
                format!("Sorry, I could not generate an answer right now: {err}")
            }
        };

        append_sources(answer, &results)
    }

    /// The ordered, append-only conversation log.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    /// Summarize the session, using at most the last ten log messages.
    pub async fn summarize_conversation(&self) -> String {
        let recent: Vec<ChatMessage> = {
            let history = self.history.lock().await;
            if history.is_empty() {
                return NO_CONVERSATION.to_string();
            }
            let skip = history.len().saturating_sub(SUMMARY_CONTEXT_MESSAGES);
            history[skip..].to_vec()
        };

        let transcript: String = recent
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    docqa_model::Role::System => "system",
                    docqa_model::Role::User => "user",
                    docqa_model::Role::Assistant => "assistant",
                };
                format!("{speaker}: {}\n", m.content)
            })
            .collect();

        let messages = [
            ChatMessage::system(SUMMARY_PROMPT),
            ChatMessage::user(format!("Summarize this conversation:\n\n{transcript}")),
        ];

        match self.model.generate(&messages).await {
            Ok(reply) => response_text(&reply),
            Err(err) => {
                warn!(error = %err, "summarization failed");
                format!("Sorry, I could not summarize the conversation: {err}")
            }
        }
    }
}

/// Truncate to `limit` characters, marking the cut with an ellipsis.
fn truncate_excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_offset, _)) => format!("{}...", &text[..byte_offset]),
        None => text.to_string(),
    }
}

/// Build the grounding prompt: labeled, truncated excerpts followed by
/// the question.
fn grounding_prompt(question: &str, results: &[RetrievalResult]) -> String {
    let mut prompt = String::from("Answer based on the following document excerpts:\n\n");
    for (i, result) in results.iter().enumerate() {
        let excerpt = truncate_excerpt(&result.content, EXCERPT_LIMIT);
        prompt.push_str(&format!(
            "Document excerpt {} (source: {}):\n{}\n\n",
            i + 1,
            result.metadata.source,
            excerpt
        ));
    }
    prompt.push_str(&format!(
        "Question: {question}\n\nAnswer from the excerpts above. If they do not contain enough \
         information, say so explicitly."
    ));
    prompt
}

/// Append a deduplicated source list, preserving first-seen order.
fn append_sources(mut answer: String, results: &[RetrievalResult]) -> String {
    let mut seen = Vec::new();
    for result in results {
        if !seen.contains(&result.metadata.source) {
            seen.push(result.metadata.source.clone());
        }
    }

    answer.push_str("\n\nSources:\n");
    for source in seen {
        answer.push_str(&format!("- {source}\n"));
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_rag::{ChunkMetadata, DocFormat};

    fn result(source: &str, content: &str) -> RetrievalResult {
        RetrievalResult {
            id: "id".to_string(),
            content: content.to_string(),
            metadata: ChunkMetadata {
                source: source.to_string(),
                doc_type: DocFormat::Text,
                chunk_index: 0,
                ocr_language: None,
            },
        }
    }

    #[test]
    fn short_excerpts_are_untouched() {
        assert_eq!(truncate_excerpt("short", 800), "short");
    }

    #[test]
    fn long_excerpts_are_cut_with_ellipsis() {
        let long = "x".repeat(900);
        let cut = truncate_excerpt(&long, 800);
        assert_eq!(cut.chars().count(), 803);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let chinese = "中".repeat(900);
        let cut = truncate_excerpt(&chinese, 800);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 803);
    }

    #[test]
    fn prompt_labels_excerpts_with_sources() {
        let prompt = grounding_prompt(
            "what is this?",
            &[result("a.pdf", "alpha"), result("b.txt", "beta")],
        );
        assert!(prompt.contains("Document excerpt 1 (source: a.pdf):"));
        assert!(prompt.contains("Document excerpt 2 (source: b.txt):"));
        assert!(prompt.contains("Question: what is this?"));
    }

    #[test]
    fn sources_are_deduplicated_in_order() {
        let answer = append_sources(
            "answer".to_string(),
            &[
                result("b.txt", "one"),
                result("a.pdf", "two"),
                result("b.txt", "three"),
            ],
        );
        let sources_part = answer.split("Sources:").nth(1).unwrap();
        assert_eq!(sources_part.matches("b.txt").count(), 1);
        let b_pos = sources_part.find("b.txt").unwrap();
        let a_pos = sources_part.find("a.pdf").unwrap();
        assert!(b_pos < a_pos, "first-seen order not preserved");
    }
}
