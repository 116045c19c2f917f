//! Workspace data model and derived identifiers.
//!
//! A workspace is the isolation unit: every workspace gets its own storage
//! folder, search index, and semantic configuration, all derived from the
//! workspace `(id, name)` pair. The derivation is pure and must be recomputed
//! identically everywhere; it is the isolation contract between tenants.
//! Renaming a workspace does not rename its index: callers keep using the
//! identifiers derived from the name the index was created under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant-scoped container for documents. Owned by the surrounding
/// application; this subsystem only reads `id` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

impl Workspace {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Derive this workspace's storage and index identifiers.
    pub fn identifiers(&self) -> WorkspaceIdentifiers {
        WorkspaceIdentifiers::resolve(&self.id, &self.name)
    }
}

/// A file accepted into a workspace, as recorded by the owning application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceFile {
    pub id: String,
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "storedName")]
    pub stored_name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
    #[serde(rename = "workspaceId")]
    pub workspace_id: String,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

/// The searchable unit uploaded into a workspace index.
///
/// `id` equals the [`WorkspaceFile::id`] it was derived from, which makes
/// indexing idempotent per file: re-indexing overwrites rather than
/// duplicates. `workspace_id` is carried redundantly (isolation already comes
/// from the per-workspace index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub content: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub file_type: String,
    #[serde(rename = "workspaceId")]
    pub workspace_id: String,
    #[serde(rename = "workspaceName")]
    pub workspace_name: String,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: String,
    pub summary: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
}

/// Identifiers derived from a workspace `(id, name)` pair.
///
/// Pure functions of their inputs: no I/O, no failure mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceIdentifiers {
    /// Storage folder, `workspace/{sanitized-name}-{short-id}/`.
    pub folder_path: String,
    /// Search index, `{sanitized-name}-{short-id}index`.
    pub index_name: String,
    /// Semantic ranking configuration, `search{index_name}`.
    pub semantic_config_name: String,
}

impl WorkspaceIdentifiers {
    pub fn resolve(workspace_id: &str, workspace_name: &str) -> Self {
        let sanitized: String = workspace_name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect();
        let short_id: String = workspace_id.chars().take(7).collect();
        let fragment = format!("{sanitized}-{short_id}");

        let index_name = format!("{fragment}index");
        Self {
            folder_path: format!("workspace/{fragment}/"),
            semantic_config_name: format!("search{index_name}"),
            index_name,
        }
    }
}
