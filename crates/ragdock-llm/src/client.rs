//! Chat completion backends.

use std::time::Duration;

use async_trait::async_trait;
use ragdock_core::config::LLM_TIMEOUT_BUFFER_SECS;
use ragdock_core::{Error, LlmSettings, Result};
use serde_json::json;
use tracing::debug;

use crate::types::{ChatMessage, CompletionOptions, CompletionResponse};

/// A chat-completion service. Callable with or without retrieved context in
/// the user message; a system-prompt message is supported.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<CompletionResponse>;
}

/// OpenAI-compatible HTTP chat backend.
///
/// Enforces the configured timeout plus a small buffer; a request that runs
/// past it is surfaced as [`Error::Timeout`] rather than hanging the caller.
pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl HttpChatBackend {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs + LLM_TIMEOUT_BUFFER_SECS);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<CompletionResponse> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        debug!("Requesting completion from {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("no reply within {}s", self.timeout.as_secs()))
            } else {
                Error::Llm(format!("completion request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("completion returned {status}: {body}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("unreadable completion body: {e}")))?;

        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let tokens_used = parsed["usage"]["total_tokens"].as_u64().unwrap_or(0) as usize;

        Ok(CompletionResponse {
            content,
            tokens_used,
        })
    }
}

/// Deterministic offline backend for memory mode and tests.
///
/// Replies with the fixed JSON shape the summarizer asks for, derived from
/// the tail of the last user message, so the whole pipeline works without a
/// network.
#[derive(Default)]
pub struct OfflineChatBackend;

impl OfflineChatBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatBackend for OfflineChatBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: CompletionOptions,
    ) -> Result<CompletionResponse> {
        let user_text = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let excerpt: String = user_text.chars().take(200).collect();
        let reply = json!({
            "summary": excerpt.trim(),
            "keyPoints": [],
            "sentiment": "neutral",
            "language": "en",
        })
        .to_string();

        Ok(CompletionResponse {
            tokens_used: user_text.len() / 4,
            content: reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_backend_replies_with_parseable_json() {
        let backend = OfflineChatBackend::new();
        let reply = backend
            .complete(
                &[
                    ChatMessage::system("You summarize documents."),
                    ChatMessage::user("Quarterly revenue grew 12%."),
                ],
                CompletionOptions::default(),
            )
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&reply.content).unwrap();
        assert!(parsed["summary"].as_str().unwrap().contains("revenue"));
        assert!(parsed["keyPoints"].is_array());
    }
}
