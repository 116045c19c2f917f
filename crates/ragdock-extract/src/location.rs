//! Blob-path resolution for the three storage layouts.

use ragdock_core::{Workspace, WorkspaceFile};

/// A resolved blob location within object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation {
    pub path: String,
    pub container: String,
}

impl BlobLocation {
    pub fn new(path: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            container: container.into(),
        }
    }

    /// Resolve where a file's bytes live. Three layouts exist:
    ///
    /// 1. `stored_name` already carries the full `workspace/` prefix: use it
    ///    verbatim.
    /// 2. The file belongs to a workspace: reconstruct the folder from the
    ///    workspace identifiers and prepend it.
    /// 3. A plain file: it sits at the container root under `stored_name`.
    pub fn for_file(
        file: &WorkspaceFile,
        workspace: Option<&Workspace>,
        container: &str,
    ) -> Self {
        if file.stored_name.starts_with("workspace/") {
            return Self::new(file.stored_name.clone(), container);
        }

        if !file.workspace_id.is_empty() {
            if let Some(ws) = workspace {
                let folder = ws.identifiers().folder_path;
                return Self::new(format!("{folder}{}", file.stored_name), container);
            }
        }

        Self::new(file.stored_name.clone(), container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn file(stored_name: &str, workspace_id: &str) -> WorkspaceFile {
        WorkspaceFile {
            id: "f1".into(),
            original_name: "report.pdf".into(),
            stored_name: stored_name.into(),
            mime_type: "application/pdf".into(),
            size: 10,
            workspace_id: workspace_id.into(),
            uploaded_by: "user".into(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn fully_qualified_path_is_used_verbatim() {
        let ws = Workspace::new("abc1234xyz", "Finance");
        let loc = BlobLocation::for_file(
            &file("workspace/finance-abc1234/report.pdf", "abc1234xyz"),
            Some(&ws),
            "documents",
        );
        assert_eq!(loc.path, "workspace/finance-abc1234/report.pdf");
    }

    #[test]
    fn workspace_file_gets_folder_reconstructed() {
        let ws = Workspace::new("abc1234xyz", "Finance");
        let loc = BlobLocation::for_file(&file("report.pdf", "abc1234xyz"), Some(&ws), "documents");
        assert_eq!(loc.path, "workspace/finance-abc1234/report.pdf");
        assert_eq!(loc.container, "documents");
    }

    #[test]
    fn plain_file_stays_at_container_root() {
        let loc = BlobLocation::for_file(&file("report.pdf", ""), None, "documents");
        assert_eq!(loc.path, "report.pdf");
    }
}
