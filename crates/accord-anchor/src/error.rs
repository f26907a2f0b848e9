//! Ledger anchor errors

use accord_core::AccordError;

/// Ledger anchoring errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnchorError {
    /// No signer credential is configured, or the credential is malformed
    #[error("Signer not configured: {message}")]
    SignerNotConfigured {
        /// Description of the credential problem
        message: String,
    },
    /// The ledger could not be reached
    #[error("Ledger network error: {message}")]
    Network {
        /// Description of the network failure
        message: String,
    },
    /// The ledger received the transaction and refused it
    #[error("Rejected by ledger: {message}")]
    Rejected {
        /// Ledger-supplied rejection reason
        message: String,
    },
    /// The anchoring attempt exceeded its bounded timeout
    #[error("Anchoring timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },
}

impl AnchorError {
    /// Create a signer-not-configured error
    pub fn signer_not_configured(message: impl Into<String>) -> Self {
        Self::SignerNotConfigured {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a rejected-by-ledger error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

impl From<AnchorError> for AccordError {
    fn from(err: AnchorError) -> Self {
        AccordError::dependency(err.to_string())
    }
}
