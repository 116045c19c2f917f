//! Document summarization with layered fallback.

use std::sync::Arc;

use ragdock_core::Result;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::ChatBackend;
use crate::types::{ChatMessage, CompletionOptions};

/// Portion of the model reply used as the summary when its JSON is unusable.
const REPLY_FALLBACK_CHARS: usize = 200;
/// How much of the document is shown to the model.
const PROMPT_CONTENT_CHARS: usize = 8_000;

/// A short summary plus key points for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub summary: String,
    pub key_points: Vec<String>,
}

/// The JSON shape the model is asked to produce. Sentiment and language are
/// requested but not consumed downstream.
#[derive(Debug, Deserialize)]
struct SummaryReply {
    #[serde(default)]
    summary: String,
    #[serde(default, rename = "keyPoints")]
    key_points: Vec<String>,
    #[serde(default)]
    #[allow(dead_code)]
    sentiment: String,
    #[serde(default)]
    #[allow(dead_code)]
    language: String,
}

/// Produces summaries via one chat completion per document.
///
/// A reply that is not valid JSON degrades to a truncated-reply summary; a
/// failed call propagates so the caller can fall back to the extracted
/// content itself. Summarization never aborts indexing.
pub struct Summarizer {
    backend: Arc<dyn ChatBackend>,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub async fn summarize(&self, text: &str, file_name: &str) -> Result<DocumentSummary> {
        let excerpt: String = text.chars().take(PROMPT_CONTENT_CHARS).collect();
        let messages = [
            ChatMessage::system(
                "You analyze documents and reply with strict JSON only: \
                 {\"summary\": string, \"keyPoints\": [string], \
                 \"sentiment\": string, \"language\": string}. \
                 No prose outside the JSON object.",
            ),
            ChatMessage::user(format!(
                "Analyze the document \"{file_name}\" and produce the JSON \
                 described above. Document content:\n\n{excerpt}"
            )),
        ];

        let reply = self
            .backend
            .complete(&messages, CompletionOptions::default())
            .await?;

        Ok(parse_reply(&reply.content, file_name))
    }
}

fn parse_reply(reply: &str, file_name: &str) -> DocumentSummary {
    if let Some(parsed) = try_parse_json(reply) {
        debug!(
            "Parsed summary for {} ({} key points)",
            file_name,
            parsed.key_points.len()
        );
        return DocumentSummary {
            summary: parsed.summary,
            key_points: parsed.key_points,
        };
    }

    warn!(
        "Summary reply for {} was not valid JSON; using truncated reply",
        file_name
    );
    DocumentSummary {
        summary: reply.chars().take(REPLY_FALLBACK_CHARS).collect(),
        key_points: Vec::new(),
    }
}

/// Accepts a bare JSON object or one wrapped in a fenced code block.
fn try_parse_json(reply: &str) -> Option<SummaryReply> {
    if let Ok(parsed) = serde_json::from_str(reply.trim()) {
        return Some(parsed);
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragdock_core::Error;

    use crate::types::CompletionResponse;

    struct ScriptedBackend {
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: CompletionOptions,
        ) -> Result<CompletionResponse> {
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    tokens_used: 42,
                }),
                Err(e) => Err(Error::Llm(e.clone())),
            }
        }
    }

    fn summarizer(reply: std::result::Result<&str, &str>) -> Summarizer {
        Summarizer::new(Arc::new(ScriptedBackend {
            reply: reply.map(String::from).map_err(String::from),
        }))
    }

    #[tokio::test]
    async fn valid_json_reply_is_parsed() {
        let s = summarizer(Ok(
            r#"{"summary": "Q3 grew", "keyPoints": ["revenue up"], "sentiment": "positive", "language": "en"}"#,
        ));
        let result = s.summarize("content", "report.pdf").await.unwrap();
        assert_eq!(result.summary, "Q3 grew");
        assert_eq!(result.key_points, vec!["revenue up".to_string()]);
    }

    #[tokio::test]
    async fn fenced_json_reply_is_parsed() {
        let s = summarizer(Ok(
            "```json\n{\"summary\": \"ok\", \"keyPoints\": []}\n```",
        ));
        let result = s.summarize("content", "report.pdf").await.unwrap();
        assert_eq!(result.summary, "ok");
    }

    #[tokio::test]
    async fn unparseable_reply_degrades_to_truncated_reply() {
        let prose = "Here is my summary: the document talks about ".repeat(20);
        let s = summarizer(Ok(prose.as_str()));
        let result = s.summarize("content", "report.pdf").await.unwrap();
        assert_eq!(result.summary.chars().count(), REPLY_FALLBACK_CHARS);
        assert!(result.key_points.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let s = summarizer(Err("rate limited"));
        assert!(s.summarize("content", "report.pdf").await.is_err());
    }
}
