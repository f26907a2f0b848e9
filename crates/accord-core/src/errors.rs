//! Unified error system for Accord
//!
//! A single error type covers the whole workspace. Each variant maps to one
//! class of the error taxonomy: client-correctable input problems, scoped
//! lookups that came back empty, authorization failures, state-machine
//! conflicts, and collaborator failures.

use serde::{Deserialize, Serialize};

/// Unified error type for all Accord operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AccordError {
    /// Invalid input (missing content, malformed vote, bad configuration)
    #[error("Invalid: {message}")]
    Invalid {
        /// Description of the invalid input
        message: String,
    },

    /// Resource not found, or the caller lacks access to it.
    ///
    /// Access-scoped queries surface absent and inaccessible identically so
    /// existence is never leaked to non-members.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found
        message: String,
    },

    /// Operation forbidden for this caller (non-member voting, author voting
    /// on their own version, non-creator inviting)
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of the authorization failure
        message: String,
    },

    /// Operation conflicts with the current state of the version or contract
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the conflicting state
        message: String,
    },

    /// An external collaborator (content store, ledger anchor) failed
    #[error("Dependency failure: {message}")]
    Dependency {
        /// Description of the collaborator failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl AccordError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a dependency failure error
    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for Accord operations
pub type Result<T> = std::result::Result<T, AccordError>;

impl From<serde_json::Error> for AccordError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
