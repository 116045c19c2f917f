//! RagDock Pipeline — ingest orchestration, job queue, reconciliation, and
//! the retrieval facade exposed to the chat-handling layer.

pub mod context;
pub mod ingest;
pub mod queue;
pub mod reconcile;
pub mod services;
pub mod workspace_store;

pub use context::{format_documents_context, DocumentRetrieval};
pub use ingest::DocumentPipeline;
pub use queue::{IngestJob, IngestQueue, IngestStatus};
pub use reconcile::{ReconciliationJob, RECONCILE_BATCH_SIZE};
pub use services::RagServices;
pub use workspace_store::{MemoryWorkspaceStore, WorkspaceStore};
