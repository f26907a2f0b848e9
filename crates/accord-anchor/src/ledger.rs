//! The ledger anchor interface consumed by the merge orchestrator

use crate::error::AnchorError;
use crate::signer::SignerCredential;
use accord_core::TxId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Build the proof memo binding a content hash to its original author's
/// external identity.
///
/// External verifiers parse this exact format; it is fixed.
pub fn proof_memo(content_hash: &str, attributed_identity: &str) -> String {
    format!("AccordProof:{content_hash}:CreatedBy:{attributed_identity}")
}

/// Outcome of checking a previously anchored proof.
///
/// Verification never throws: an unreachable ledger reports
/// `exists == false` with the error populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// Whether a successful transaction exists for the id
    pub exists: bool,
    /// Failure detail when the check could not be completed or the
    /// transaction failed
    pub error: Option<String>,
}

/// Append-only proof ledger.
///
/// `anchor` must have no side effects on the caller's local state when it
/// errors; a returned [`TxId`] is the only durable evidence of success.
#[async_trait]
pub trait LedgerAnchor: Send + Sync {
    /// Anchor a proof record for `content_hash`, attributing authorship to
    /// `attributed_identity`, signed with `credential`.
    async fn anchor(
        &self,
        content_hash: &str,
        attributed_identity: &str,
        credential: &SignerCredential,
    ) -> Result<TxId, AnchorError>;

    /// Check whether a previously returned transaction id exists on the
    /// ledger as a successful transaction.
    async fn verify(&self, tx_id: &TxId) -> VerifyOutcome;
}

/// Anchor with a bounded timeout.
///
/// A timeout is an anchoring failure like any other; the caller's local
/// commit is unaffected.
pub async fn anchor_with_timeout(
    ledger: &dyn LedgerAnchor,
    content_hash: &str,
    attributed_identity: &str,
    credential: &SignerCredential,
    timeout: Duration,
) -> Result<TxId, AnchorError> {
    match tokio::time::timeout(
        timeout,
        ledger.anchor(content_hash, attributed_identity, credential),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(AnchorError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
