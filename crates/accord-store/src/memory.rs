//! In-memory content-addressed store (local/test fallback)

use crate::error::StoreError;
use crate::store::ContentStore;
use accord_core::{sha256_hex, ContentRef};
use async_lock::Mutex;
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory content-addressed store.
///
/// References are the hex SHA-256 of the blob, so identical content dedupes
/// naturally. Intended for tests and single-process deployments; production
/// use goes through a gateway-backed [`ContentStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs held
    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    /// True when no blobs are held
    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, blob: &[u8]) -> Result<ContentRef, StoreError> {
        let reference = sha256_hex(blob);
        let mut guard = self.blobs.lock().await;
        guard.entry(reference.clone()).or_insert_with(|| blob.to_vec());
        tracing::debug!(reference = %reference, bytes = blob.len(), "stored blob");
        Ok(ContentRef::new(reference))
    }

    async fn get(&self, reference: &ContentRef) -> Result<Vec<u8>, StoreError> {
        let guard = self.blobs.lock().await;
        guard
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                reference: reference.clone(),
            })
    }
}
