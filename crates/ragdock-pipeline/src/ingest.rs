//! The ingest half of the pipeline: extract → summarize → index.

use ragdock_core::{IndexDocument, Workspace, WorkspaceFile};
use ragdock_extract::{BlobLocation, ContentExtractor, ExtractedContent};
use ragdock_llm::{DocumentSummary, Summarizer};
use ragdock_search::{IndexManager, Indexer};
use tracing::{info, warn};

use crate::services::RagServices;

/// When summarization fails outright, this much of the extracted content
/// stands in for the summary.
const CONTENT_FALLBACK_CHARS: usize = 500;

/// Turns a stored workspace file into an indexed document.
///
/// Every step degrades instead of failing the file: extraction produces a
/// placeholder, summarization falls back to truncated content, and index
/// failures surface as a `false` return, logged by the caller.
pub struct DocumentPipeline {
    extractor: ContentExtractor,
    summarizer: Summarizer,
    index_manager: IndexManager,
    indexer: Indexer,
    container: String,
}

impl DocumentPipeline {
    pub fn new(services: &RagServices) -> Self {
        Self {
            extractor: ContentExtractor::new(services.object_store.clone()),
            summarizer: Summarizer::new(services.chat.clone()),
            index_manager: IndexManager::new(services.search.clone()),
            indexer: Indexer::new(services.search.clone()),
            container: services.config.storage.container.clone(),
        }
    }

    /// Extract the file's searchable text from object storage.
    pub async fn extract(
        &self,
        workspace: &Workspace,
        file: &WorkspaceFile,
    ) -> ExtractedContent {
        let location = BlobLocation::for_file(file, Some(workspace), &self.container);
        self.extractor.extract(&location, &file.original_name).await
    }

    /// Build the index document for a file from its extracted content.
    pub async fn to_document(
        &self,
        workspace: &Workspace,
        file: &WorkspaceFile,
        content: &ExtractedContent,
    ) -> IndexDocument {
        let summary = match self
            .summarizer
            .summarize(&content.content, &file.original_name)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    "Summarization failed for {}; falling back to content excerpt: {}",
                    file.original_name, e
                );
                DocumentSummary {
                    summary: content.content.chars().take(CONTENT_FALLBACK_CHARS).collect(),
                    key_points: Vec::new(),
                }
            }
        };

        IndexDocument {
            id: file.id.clone(),
            content: content.content.clone(),
            file_name: file.original_name.clone(),
            file_type: file.mime_type.clone(),
            workspace_id: workspace.id.clone(),
            workspace_name: workspace.name.clone(),
            uploaded_by: file.uploaded_by.clone(),
            uploaded_at: file.uploaded_at.to_rfc3339(),
            summary: summary.summary,
            key_points: summary.key_points,
        }
    }

    /// Ensure the workspace index exists. Returns `false` when it neither
    /// exists nor could be created.
    pub async fn ensure_index(&self, index_name: &str) -> bool {
        self.index_manager.ensure(index_name).await
    }

    /// Run the full ingest path for one file. Returns whether the document
    /// ended up in the index.
    pub async fn index_file(&self, workspace: &Workspace, file: &WorkspaceFile) -> bool {
        let index_name = workspace.identifiers().index_name;

        if !self.ensure_index(&index_name).await {
            warn!(
                "Index {} unavailable; skipping indexing of {}",
                index_name, file.original_name
            );
            return false;
        }

        let content = self.extract(workspace, file).await;
        let document = self.to_document(workspace, file, &content).await;

        let indexed = self.indexer.index_one(&index_name, &document).await;
        if indexed {
            info!("Indexed {} into {}", file.original_name, index_name);
        }
        indexed
    }

    /// Upload a prepared batch. Returns `true` iff at least one document was
    /// accepted.
    pub async fn index_batch(&self, index_name: &str, documents: &[IndexDocument]) -> bool {
        self.indexer.index_batch(index_name, documents).await
    }
}
