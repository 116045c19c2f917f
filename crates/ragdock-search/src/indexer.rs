//! Document upload with partial-failure tolerance.

use std::sync::Arc;

use ragdock_core::IndexDocument;
use tracing::{debug, warn};

use crate::backend::SearchBackend;

/// Uploads documents into a workspace index.
///
/// Documents are keyed by file id, so re-indexing a file overwrites its
/// previous document rather than duplicating it. Individual failures are
/// logged, never retried, and never block sibling documents.
pub struct Indexer {
    backend: Arc<dyn SearchBackend>,
}

impl Indexer {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Upload one document. Returns whether the upload succeeded.
    pub async fn index_one(&self, index_name: &str, document: &IndexDocument) -> bool {
        self.index_batch(index_name, std::slice::from_ref(document))
            .await
    }

    /// Upload a batch. Returns `true` iff at least one document was accepted.
    pub async fn index_batch(&self, index_name: &str, documents: &[IndexDocument]) -> bool {
        if documents.is_empty() {
            return false;
        }

        let statuses = match self.backend.upload_documents(index_name, documents).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(
                    "Upload of {} documents to {} failed: {}",
                    documents.len(),
                    index_name,
                    e
                );
                return false;
            }
        };

        let mut succeeded = 0usize;
        for status in &statuses {
            if status.status {
                succeeded += 1;
            } else {
                warn!(
                    "Document {} rejected by {}: {}",
                    status.key,
                    index_name,
                    status.error_message.as_deref().unwrap_or("unknown error")
                );
            }
        }

        debug!(
            "Indexed {}/{} documents into {}",
            succeeded,
            documents.len(),
            index_name
        );
        succeeded > 0
    }
}
