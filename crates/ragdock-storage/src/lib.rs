//! RagDock Storage — object-storage reads behind a swappable trait.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use ragdock_core::Result;

pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;

/// Read access to previously uploaded bytes.
///
/// `path` is the blob path within `container` (e.g.
/// `workspace/finance-abc1234/report.pdf`).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, path: &str, container: &str) -> Result<Vec<u8>>;
}
