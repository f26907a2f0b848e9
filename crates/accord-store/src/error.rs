//! Content store errors
//!
//! `NotFound` and `Unavailable` are distinct from `Decode`: the first two
//! describe the store, the last describes the bytes it returned.

use accord_core::{AccordError, ContentRef};

/// Content store operation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No blob exists for the reference
    #[error("Content not found for reference {reference}")]
    NotFound {
        /// The reference that resolved to nothing
        reference: ContentRef,
    },
    /// The store itself could not be reached or refused the operation
    #[error("Content store unavailable: {message}")]
    Unavailable {
        /// Description of the availability failure
        message: String,
    },
    /// The blob was retrieved but could not be decoded as expected
    #[error("Content decode failed: {message}")]
    Decode {
        /// Description of the decode failure
        message: String,
    },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<StoreError> for AccordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { reference } => {
                AccordError::dependency(format!("content not found for {reference}"))
            }
            StoreError::Unavailable { message } => {
                AccordError::dependency(format!("content store unavailable: {message}"))
            }
            StoreError::Decode { message } => {
                AccordError::dependency(format!("content decode failed: {message}"))
            }
        }
    }
}
