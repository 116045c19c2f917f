//! RagDock Search — per-workspace index management, indexing, retrieval.

pub mod backend;
pub mod http;
pub mod index;
pub mod indexer;
pub mod memory;
pub mod retriever;
pub mod types;

pub use backend::SearchBackend;
pub use http::HttpSearchBackend;
pub use index::IndexManager;
pub use indexer::Indexer;
pub use memory::MemorySearchBackend;
pub use retriever::{RankedDocument, Retriever};
pub use types::{DocumentStatus, IndexDefinition, QueryRequest, SearchHit};
