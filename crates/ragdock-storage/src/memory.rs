//! In-memory object store for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use ragdock_core::{Error, Result};

use crate::ObjectStore;

/// Blob store backed by a process-local map, keyed by `(container, path)`.
#[derive(Default)]
pub struct MemoryObjectStore {
    blobs: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob. Overwrites any existing blob at the same path.
    pub fn put(&self, path: &str, container: &str, bytes: impl Into<Vec<u8>>) {
        self.blobs
            .write()
            .insert((container.to_string(), path.to_string()), bytes.into());
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, path: &str, container: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .get(&(container.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| Error::Storage(format!("no blob at {container}/{path}")))
    }
}
