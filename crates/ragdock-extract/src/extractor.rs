//! Content extraction dispatch.
//!
//! `extract` never returns an error. Whatever goes wrong (unreadable blob,
//! corrupt document, unsupported format) the result is a placeholder string
//! describing the problem, and the pipeline continues with degraded content.

use std::sync::Arc;

use ragdock_storage::ObjectStore;
use tracing::{debug, warn};

use crate::kind::FileKind;
use crate::location::BlobLocation;
use crate::{markup, office, pdf};

/// Truncation budget, ~10,000 tokens at ~4 chars per token.
pub const MAX_CONTENT_CHARS: usize = 40_000;

/// Prefix shared by every placeholder produced when extraction degrades.
const UNAVAILABLE_PREFIX: &str = "Content not available";

/// Text extracted from a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub content: String,
    /// Size of the extracted text in bytes, before truncation.
    pub size: usize,
}

impl ExtractedContent {
    fn from_text(text: String) -> Self {
        let size = text.len();
        Self {
            content: truncate_chars(text, MAX_CONTENT_CHARS),
            size,
        }
    }

    fn unavailable(reason: impl std::fmt::Display) -> Self {
        let content = format!("{UNAVAILABLE_PREFIX}: {reason}");
        Self {
            size: content.len(),
            content,
        }
    }

    /// True when this is a degradation placeholder rather than real content.
    pub fn is_unavailable(&self) -> bool {
        self.content.starts_with(UNAVAILABLE_PREFIX)
    }
}

/// Dispatches blob bytes to a format-specific extractor by file extension.
pub struct ContentExtractor {
    store: Arc<dyn ObjectStore>,
}

impl ContentExtractor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Extract searchable text for a stored file.
    pub async fn extract(&self, location: &BlobLocation, original_name: &str) -> ExtractedContent {
        let bytes = match self.store.get(&location.path, &location.container).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Blob read failed for {}: {}", original_name, e);
                return ExtractedContent::unavailable(format!(
                    "could not read {original_name}: {e}"
                ));
            }
        };

        let ext = FileKind::extension_of(original_name);
        let kind = FileKind::from_extension(&ext);
        debug!(
            "Extracting {} ({} bytes, kind {:?})",
            original_name,
            bytes.len(),
            kind
        );

        match kind {
            FileKind::Pdf => self.extract_pdf(bytes, original_name).await,
            FileKind::Docx => match office::extract_docx(&bytes) {
                Ok(text) => ExtractedContent::from_text(text),
                Err(e) => {
                    warn!("docx extraction failed for {}: {}", original_name, e);
                    ExtractedContent::unavailable(format!(
                        "could not extract text from {original_name}: {e}"
                    ))
                }
            },
            FileKind::DocLegacy => ExtractedContent::unavailable(format!(
                "legacy .doc format is not supported for {original_name}; convert to .docx"
            )),
            FileKind::Spreadsheet => self.extract_spreadsheet(bytes, original_name).await,
            FileKind::PlainText => {
                ExtractedContent::from_text(String::from_utf8_lossy(&bytes).into_owned())
            }
            FileKind::Json => ExtractedContent::from_text(pretty_json(&bytes)),
            FileKind::Markup => {
                ExtractedContent::from_text(markup::strip_tags(&String::from_utf8_lossy(&bytes)))
            }
            FileKind::Unknown => extract_unknown(&bytes, original_name, &ext),
        }
    }

    /// PDF parsing is CPU-heavy and occasionally panics on malformed input,
    /// so it runs on the blocking pool with the panic contained.
    async fn extract_pdf(&self, bytes: Vec<u8>, original_name: &str) -> ExtractedContent {
        let result = tokio::task::spawn_blocking(move || pdf::extract_text(&bytes)).await;
        match result {
            Ok(Ok(text)) => ExtractedContent::from_text(text),
            Ok(Err(e)) => {
                warn!("PDF extraction failed for {}: {}", original_name, e);
                ExtractedContent::unavailable(format!(
                    "could not extract text from {original_name}: {e}"
                ))
            }
            Err(e) => {
                warn!("PDF extraction panicked for {}: {}", original_name, e);
                ExtractedContent::unavailable(format!(
                    "could not extract text from {original_name}: extractor crashed"
                ))
            }
        }
    }

    async fn extract_spreadsheet(&self, bytes: Vec<u8>, original_name: &str) -> ExtractedContent {
        let result = tokio::task::spawn_blocking(move || office::extract_spreadsheet(&bytes)).await;
        match result {
            Ok(Ok(text)) => ExtractedContent::from_text(text),
            Ok(Err(e)) => {
                warn!("Spreadsheet extraction failed for {}: {}", original_name, e);
                ExtractedContent::unavailable(format!(
                    "could not extract text from {original_name}: {e}"
                ))
            }
            Err(e) => {
                warn!("Spreadsheet extraction panicked for {}: {}", original_name, e);
                ExtractedContent::unavailable(format!(
                    "could not extract text from {original_name}: extractor crashed"
                ))
            }
        }
    }
}

/// Best-effort UTF-8 decode for unrecognized extensions. Mostly-binary
/// content degrades to a placeholder naming the extension.
fn extract_unknown(bytes: &[u8], original_name: &str, ext: &str) -> ExtractedContent {
    let text = String::from_utf8_lossy(bytes);
    let control_chars = text
        .chars()
        .filter(|c| c.is_control() && *c != '\n' && *c != '\r' && *c != '\t')
        .count();

    if !text.is_empty() && control_chars > text.chars().count() / 10 {
        let shown = if ext.is_empty() { "(none)" } else { ext };
        return ExtractedContent::unavailable(format!(
            "unsupported file type .{shown} for {original_name}"
        ));
    }
    ExtractedContent::from_text(text.into_owned())
}

/// Pretty-printed re-serialization when the bytes parse as JSON, raw text
/// otherwise.
fn pretty_json(bytes: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn truncate_chars(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    text.chars().take(limit).collect()
}
