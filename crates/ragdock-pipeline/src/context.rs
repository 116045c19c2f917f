//! Retrieval facade exposed to the chat-handling layer.

use std::sync::Arc;

use ragdock_core::WorkspaceIdentifiers;
use ragdock_search::{RankedDocument, Retriever, SearchBackend};
use tracing::debug;

/// Fetches ranked workspace documents for a chat query.
pub struct DocumentRetrieval {
    retriever: Retriever,
}

impl DocumentRetrieval {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            retriever: Retriever::new(backend),
        }
    }

    /// Retrieve the documents most relevant to `query`.
    ///
    /// An absent or empty workspace id means general (non-RAG) mode: the
    /// result is empty and no network call is made. Retrieval problems also
    /// yield an empty list, and the chat layer answers without context.
    pub async fn get_relevant_documents(
        &self,
        query: &str,
        workspace_id: Option<&str>,
        workspace_name: &str,
    ) -> Vec<RankedDocument> {
        let Some(workspace_id) = workspace_id.filter(|id| !id.trim().is_empty()) else {
            debug!("No workspace in scope; skipping retrieval");
            return Vec::new();
        };

        let ids = WorkspaceIdentifiers::resolve(workspace_id, workspace_name);
        self.retriever.search(&ids.index_name, query, None).await
    }
}

/// Render retrieved documents as a prompt-ready context block.
///
/// One block per document: `File Name`, `File Type`, `Summary` (when
/// present), then `Content`. An empty input renders to an empty string.
pub fn format_documents_context(documents: &[RankedDocument]) -> String {
    if documents.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = documents
        .iter()
        .map(|ranked| {
            let doc = &ranked.document;
            let mut block = format!(
                "File Name: {}\nFile Type: {}\n",
                doc.file_name, doc.file_type
            );
            if !doc.summary.is_empty() {
                block.push_str(&format!("Summary: {}\n", doc.summary));
            }
            block.push_str(&format!("Content: {}", doc.content));
            block
        })
        .collect();

    blocks.join("\n\n")
}
