//! In-memory proof ledger (intended for tests)

use crate::error::AnchorError;
use crate::ledger::{proof_memo, LedgerAnchor, VerifyOutcome};
use crate::signer::SignerCredential;
use accord_core::TxId;
use async_lock::Mutex;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A proof record held by the in-memory ledger
#[derive(Debug, Clone)]
pub struct AnchoredProof {
    /// The memo that was anchored
    pub memo: String,
    /// Hex-encoded signature over the memo
    pub signature: String,
}

/// In-memory ledger anchor.
///
/// Signs each memo with the supplied credential and derives the transaction
/// id from the signature, so ids are deterministic for a given key and memo.
#[derive(Default)]
pub struct MemoryLedgerAnchor {
    transactions: Mutex<HashMap<TxId, AnchoredProof>>,
}

impl MemoryLedgerAnchor {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of anchored proofs
    pub async fn len(&self) -> usize {
        self.transactions.lock().await.len()
    }

    /// True when nothing has been anchored
    pub async fn is_empty(&self) -> bool {
        self.transactions.lock().await.is_empty()
    }

    /// Fetch an anchored proof by transaction id
    pub async fn proof(&self, tx_id: &TxId) -> Option<AnchoredProof> {
        self.transactions.lock().await.get(tx_id).cloned()
    }
}

#[async_trait]
impl LedgerAnchor for MemoryLedgerAnchor {
    async fn anchor(
        &self,
        content_hash: &str,
        attributed_identity: &str,
        credential: &SignerCredential,
    ) -> Result<TxId, AnchorError> {
        let memo = proof_memo(content_hash, attributed_identity);
        let signature = credential.sign(memo.as_bytes());
        let mut hasher = Sha256::new();
        hasher.update(signature.to_bytes());
        hasher.update(memo.as_bytes());
        let tx_id = TxId::new(hex::encode(hasher.finalize()));

        let mut guard = self.transactions.lock().await;
        guard.insert(
            tx_id.clone(),
            AnchoredProof {
                memo,
                signature: hex::encode(signature.to_bytes()),
            },
        );
        tracing::info!(tx = %tx_id, "anchored proof record");
        Ok(tx_id)
    }

    async fn verify(&self, tx_id: &TxId) -> VerifyOutcome {
        let guard = self.transactions.lock().await;
        if guard.contains_key(tx_id) {
            VerifyOutcome {
                exists: true,
                error: None,
            }
        } else {
            VerifyOutcome {
                exists: false,
                error: Some("Transaction not found".to_string()),
            }
        }
    }
}
