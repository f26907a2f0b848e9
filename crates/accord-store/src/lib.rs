//! # Accord Store - content-addressed storage collaborator
//!
//! **Purpose**: Define the narrow interface the engine consumes for blob
//! storage, plus the in-memory content-addressed implementation used as the
//! local/test fallback.
//!
//! Version rows hold an opaque [`ContentRef`](accord_core::ContentRef); the
//! bytes behind a reference are only ever reachable through a
//! [`ContentStore`]. Production deployments plug in a pinning-gateway
//! implementation behind the same trait; nothing in the engine changes.
//!
//! Callers must not assume deduplication: `put` is idempotent-safe to call
//! twice with identical content, but whether the store returns the same
//! reference is an implementation detail.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryContentStore;
pub use store::ContentStore;
