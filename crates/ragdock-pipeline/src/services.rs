//! Service wiring, resolved once at startup.
//!
//! One `RagServices` is built per process and passed by reference; no service
//! reads the environment or decides real-vs-fake on its own.

use std::sync::Arc;

use ragdock_core::{RagConfig, Result, ServiceMode};
use ragdock_llm::{ChatBackend, HttpChatBackend, OfflineChatBackend};
use ragdock_search::{HttpSearchBackend, MemorySearchBackend, SearchBackend};
use ragdock_storage::{HttpObjectStore, MemoryObjectStore, ObjectStore};
use tracing::info;

use crate::context::DocumentRetrieval;
use crate::ingest::DocumentPipeline;

/// The three external services this subsystem consumes, behind their traits.
#[derive(Clone)]
pub struct RagServices {
    pub config: RagConfig,
    pub object_store: Arc<dyn ObjectStore>,
    pub search: Arc<dyn SearchBackend>,
    pub chat: Arc<dyn ChatBackend>,
}

impl RagServices {
    /// Select concrete implementations per the configured [`ServiceMode`].
    pub fn from_config(config: RagConfig) -> Result<Self> {
        info!("Initializing services in {:?} mode", config.mode);
        match config.mode {
            ServiceMode::Remote => {
                let object_store = Arc::new(HttpObjectStore::new(&config.storage)?);
                let search = Arc::new(HttpSearchBackend::new(&config.search)?);
                let chat = Arc::new(HttpChatBackend::new(&config.llm)?);
                Ok(Self {
                    config,
                    object_store,
                    search,
                    chat,
                })
            }
            ServiceMode::Memory => Ok(Self::in_memory_with(
                config,
                Arc::new(MemoryObjectStore::new()),
                Arc::new(MemorySearchBackend::new()),
            )),
        }
    }

    /// Wire in-memory services, keeping the given handles so tests can seed
    /// blobs and inspect indexes.
    pub fn in_memory_with(
        config: RagConfig,
        object_store: Arc<MemoryObjectStore>,
        search: Arc<MemorySearchBackend>,
    ) -> Self {
        Self {
            config,
            object_store,
            search,
            chat: Arc::new(OfflineChatBackend::new()),
        }
    }

    /// The ingest half of the pipeline (extract → summarize → index).
    pub fn pipeline(&self) -> DocumentPipeline {
        DocumentPipeline::new(self)
    }

    /// The query half (retrieve → shape context).
    pub fn retrieval(&self) -> DocumentRetrieval {
        DocumentRetrieval::new(self.search.clone())
    }
}
