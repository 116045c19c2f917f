//! RagDock LLM — chat completion client and document summarization.

pub mod client;
pub mod summarizer;
pub mod types;

pub use client::{ChatBackend, HttpChatBackend, OfflineChatBackend};
pub use summarizer::{DocumentSummary, Summarizer};
pub use types::{ChatMessage, CompletionOptions, CompletionResponse};
