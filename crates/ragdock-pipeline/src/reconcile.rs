//! Reconciliation: repair drift between stored files and the search index.

use std::sync::Arc;

use ragdock_core::IndexDocument;
use tracing::{debug, info, warn};

use crate::ingest::DocumentPipeline;
use crate::workspace_store::WorkspaceStore;

/// Documents per upload call during reconciliation, bounding request size.
pub const RECONCILE_BATCH_SIZE: usize = 5;

/// Walks every file of a workspace and re-ingests it.
///
/// The sweep is idempotent: documents are keyed by file id, so re-indexing
/// overwrites. Every file is re-extracted and re-summarized on every run;
/// there is no persisted "already indexed" marker to consult. Per-file and
/// per-batch failures are logged and do not stop the run.
pub struct ReconciliationJob {
    workspaces: Arc<dyn WorkspaceStore>,
    pipeline: Arc<DocumentPipeline>,
}

impl ReconciliationJob {
    pub fn new(workspaces: Arc<dyn WorkspaceStore>, pipeline: Arc<DocumentPipeline>) -> Self {
        Self {
            workspaces,
            pipeline,
        }
    }

    /// Re-index every file of the workspace. Returns `false` only when the
    /// workspace cannot be found.
    pub async fn reconcile(&self, workspace_id: &str) -> bool {
        let workspace = match self.workspaces.find_workspace(workspace_id).await {
            Ok(Some(workspace)) => workspace,
            Ok(None) => {
                warn!("Cannot reconcile unknown workspace {}", workspace_id);
                return false;
            }
            Err(e) => {
                warn!("Workspace lookup failed for {}: {}", workspace_id, e);
                return false;
            }
        };

        let files = match self.workspaces.list_files(workspace_id).await {
            Ok(files) => files,
            Err(e) => {
                warn!("File listing failed for {}: {}", workspace_id, e);
                return true;
            }
        };

        let index_name = workspace.identifiers().index_name;
        info!(
            "Reconciling workspace {} ({} files) into {}",
            workspace.name,
            files.len(),
            index_name
        );

        if !self.pipeline.ensure_index(&index_name).await {
            warn!(
                "Index {} unavailable; skipping reconciliation of {} files",
                index_name,
                files.len()
            );
            return true;
        }

        let mut batch: Vec<IndexDocument> = Vec::with_capacity(RECONCILE_BATCH_SIZE);
        let mut indexed = 0usize;
        let mut skipped = 0usize;

        for file in &files {
            let content = self.pipeline.extract(&workspace, file).await;
            if content.is_unavailable() {
                debug!("Skipping {}: content not available", file.original_name);
                skipped += 1;
                continue;
            }

            let document = self.pipeline.to_document(&workspace, file, &content).await;
            batch.push(document);

            if batch.len() == RECONCILE_BATCH_SIZE {
                indexed += self.flush(&index_name, &mut batch).await;
            }
        }
        indexed += self.flush(&index_name, &mut batch).await;

        info!(
            "Reconciliation of {} done: {} indexed, {} skipped",
            workspace.name, indexed, skipped
        );
        true
    }

    /// Upload and clear the pending batch, returning how many documents it
    /// held if the upload was (at least partially) accepted.
    async fn flush(&self, index_name: &str, batch: &mut Vec<IndexDocument>) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let size = batch.len();
        let accepted = self.pipeline.index_batch(index_name, batch).await;
        if !accepted {
            warn!("Batch of {} documents rejected by {}", size, index_name);
        }
        batch.clear();
        if accepted {
            size
        } else {
            0
        }
    }
}
