//! Per-workspace index lifecycle.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::SearchBackend;
use crate::types::{
    IndexDefinition, IndexField, PrioritizedFields, SemanticConfiguration, SemanticField,
    SemanticSettings,
};

/// Build the fixed schema for a workspace index, including its single
/// semantic configuration `search{index_name}`.
pub fn workspace_index_definition(index_name: &str) -> IndexDefinition {
    IndexDefinition {
        name: index_name.to_string(),
        fields: vec![
            IndexField::key("id"),
            IndexField::string("content"),
            IndexField::string("fileName"),
            IndexField::string("fileType").filterable(),
            IndexField::string("workspaceId").filterable(),
            IndexField::string("workspaceName").filterable(),
            IndexField::string("uploadedBy").filterable(),
            IndexField::string("uploadedAt").filterable(),
            IndexField::string("summary"),
            IndexField::string_collection("keyPoints"),
        ],
        semantic: SemanticSettings {
            configurations: vec![SemanticConfiguration {
                name: format!("search{index_name}"),
                prioritized_fields: PrioritizedFields {
                    title_field: SemanticField::new("fileName"),
                    prioritized_content_fields: vec![
                        SemanticField::new("content"),
                        SemanticField::new("summary"),
                    ],
                    prioritized_keywords_fields: vec![
                        SemanticField::new("fileName"),
                        SemanticField::new("workspaceName"),
                        SemanticField::new("fileType"),
                        SemanticField::new("keyPoints"),
                    ],
                },
            }],
        },
    }
}

/// Creates, checks and deletes workspace indexes.
///
/// Every operation reports success as a boolean and never raises: callers
/// check the result, log, and skip dependent work on failure. There is no
/// transaction across `exists` → `create`; two racers may both create, and
/// the backend treats the loser's conflict as success.
pub struct IndexManager {
    backend: Arc<dyn SearchBackend>,
}

impl IndexManager {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Whether an index with this name exists.
    pub async fn exists(&self, index_name: &str) -> bool {
        match self.backend.list_index_names().await {
            Ok(names) => names.iter().any(|n| n == index_name),
            Err(e) => {
                warn!("Could not list indexes: {}", e);
                false
            }
        }
    }

    /// Create the workspace index. Returns `false` on failure.
    pub async fn create(&self, index_name: &str) -> bool {
        let definition = workspace_index_definition(index_name);
        match self.backend.create_index(&definition).await {
            Ok(()) => {
                info!("Created index {}", index_name);
                true
            }
            Err(e) => {
                warn!("Failed to create index {}: {}", index_name, e);
                false
            }
        }
    }

    /// Best-effort deletion. Returns `false` on failure.
    pub async fn delete(&self, index_name: &str) -> bool {
        match self.backend.delete_index(index_name).await {
            Ok(()) => {
                info!("Deleted index {}", index_name);
                true
            }
            Err(e) => {
                warn!("Failed to delete index {}: {}", index_name, e);
                false
            }
        }
    }

    /// Ensure the index exists, creating it if absent. Returns `false` when
    /// the index neither exists nor could be created.
    pub async fn ensure(&self, index_name: &str) -> bool {
        if self.exists(index_name).await {
            return true;
        }
        self.create(index_name).await
    }
}
