//! The search-service interface.

use async_trait::async_trait;
use ragdock_core::{IndexDocument, Result};

use crate::types::{DocumentStatus, IndexDefinition, QueryRequest, SearchHit};

/// Index CRUD and query operations against a search service.
///
/// `create_index` must be idempotent: a conflict from a concurrent creator is
/// success-equivalent, never an error. `upload_documents` reports per-document
/// outcomes; document keys are last-write-wins on the service side.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn list_index_names(&self) -> Result<Vec<String>>;

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()>;

    async fn delete_index(&self, name: &str) -> Result<()>;

    async fn upload_documents(
        &self,
        index_name: &str,
        documents: &[IndexDocument],
    ) -> Result<Vec<DocumentStatus>>;

    async fn query(&self, index_name: &str, request: &QueryRequest) -> Result<Vec<SearchHit>>;
}
