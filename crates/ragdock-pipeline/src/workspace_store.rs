//! Interface to the relational side that owns workspaces and file records.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use ragdock_core::{Result, Workspace, WorkspaceFile};

/// Read access to workspaces and their file records. The owning application
/// implements this over its relational store; this subsystem only reads.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn find_workspace(&self, workspace_id: &str) -> Result<Option<Workspace>>;

    async fn list_files(&self, workspace_id: &str) -> Result<Vec<WorkspaceFile>>;
}

/// Process-local [`WorkspaceStore`] for development and tests.
#[derive(Default)]
pub struct MemoryWorkspaceStore {
    workspaces: RwLock<HashMap<String, Workspace>>,
    files: RwLock<Vec<WorkspaceFile>>,
}

impl MemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_workspace(&self, workspace: Workspace) {
        self.workspaces
            .write()
            .insert(workspace.id.clone(), workspace);
    }

    pub fn add_file(&self, file: WorkspaceFile) {
        self.files.write().push(file);
    }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    async fn find_workspace(&self, workspace_id: &str) -> Result<Option<Workspace>> {
        Ok(self.workspaces.read().get(workspace_id).cloned())
    }

    async fn list_files(&self, workspace_id: &str) -> Result<Vec<WorkspaceFile>> {
        Ok(self
            .files
            .read()
            .iter()
            .filter(|f| f.workspace_id == workspace_id)
            .cloned()
            .collect())
    }
}
