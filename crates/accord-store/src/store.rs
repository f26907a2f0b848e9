//! The content store interface consumed by the engine

use crate::error::StoreError;
use accord_core::ContentRef;
use async_trait::async_trait;

/// Content-addressable blob storage.
///
/// Implementations issue a stable reference for each stored blob and resolve
/// references back to bytes. Retrieval may fail independently of any other
/// state the caller holds.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a blob and return its reference.
    ///
    /// Calling `put` twice with identical bytes is always safe; the store
    /// may or may not dedupe.
    async fn put(&self, blob: &[u8]) -> Result<ContentRef, StoreError>;

    /// Resolve a reference to the stored bytes.
    async fn get(&self, reference: &ContentRef) -> Result<Vec<u8>, StoreError>;

    /// Resolve a reference to UTF-8 text.
    ///
    /// A blob that exists but is not valid UTF-8 is a [`StoreError::Decode`],
    /// distinct from the store being unreachable or the reference dangling.
    async fn get_text(&self, reference: &ContentRef) -> Result<String, StoreError> {
        let bytes = self.get(reference).await?;
        String::from_utf8(bytes).map_err(|e| StoreError::decode(e.to_string()))
    }
}
