//! The merge/anchor orchestrator
//!
//! Promotion is the application-level commit: once the contract's
//! `current_version` pointer and the version's merged flag are written, the
//! merge has succeeded from the caller's perspective. Proof anchoring runs
//! afterwards, outside the contract lock, bounded by a timeout; its failure
//! is captured into the returned proof record and never reverts the merge.

use crate::engine::ContractEngine;
use crate::records::{MergeOutcome, OnchainProof};
use crate::state::EngineState;
use accord_core::{
    AccordError, ApprovalStatus, ContractId, Result, UserId, VersionId, sha256_hex,
};
use accord_anchor::anchor_with_timeout;
use chrono::Utc;

/// Steps 1 and 2 of the merge: promote the version to canonical and mark it
/// merged. Runs under the contract lock; must not await collaborators.
pub(crate) fn promote(state: &mut EngineState, contract: ContractId, version: VersionId) {
    let now = Utc::now();
    if let Some(row) = state.contracts.get_mut(&contract) {
        row.current_version = Some(version);
        row.updated_at = now;
    }
    if let Some(row) = state.versions.get_mut(&version) {
        row.merged = true;
        row.approval_status = ApprovalStatus::Merged;
    }
}

impl ContractEngine {
    /// Explicitly merge an approved version.
    ///
    /// Idempotent: a version that is already merged is a no-op returning the
    /// proof fields persisted by the original merge, without re-anchoring.
    /// A version that is not yet approved is an `InvalidState` conflict.
    pub async fn merge_version(
        &self,
        caller: UserId,
        contract: ContractId,
        version: VersionId,
    ) -> Result<MergeOutcome> {
        {
            let state = self.state.read().await;
            state
                .accessible_contract(caller, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        }

        let lock = self.contract_lock(contract).await;
        let guard = lock.lock().await;

        {
            let mut state = self.state.write().await;
            let row = state
                .version_in_contract(contract, version)
                .ok_or_else(|| AccordError::not_found("Version not found"))?;
            if row.merged {
                // Second invocation of the orchestrator: report the existing
                // proof state and touch nothing.
                let proof = OnchainProof {
                    content_hash: row.content_hash.clone(),
                    tx_hash: row.anchor_tx.clone(),
                    error: None,
                };
                return Ok(MergeOutcome {
                    message: "Version already merged".to_string(),
                    onchain_proof: proof,
                });
            }
            if row.approval_status != ApprovalStatus::Approved {
                return Err(AccordError::invalid_state(
                    "Version must be approved before merging",
                ));
            }
            promote(&mut state, contract, version);
        }

        drop(guard);

        let proof = self.anchor_merged_version(version).await;
        self.notifier.merge_completed(version, &proof).await;
        tracing::info!(contract = %contract, version = %version, "version merged");
        Ok(MergeOutcome {
            message: "Version merged successfully".to_string(),
            onchain_proof: proof,
        })
    }

    /// Step 3: best-effort proof anchoring for a just-merged version.
    ///
    /// Computes and persists the content hash, then attempts to anchor a
    /// proof attributing authorship to the original author's external
    /// identity. Every failure path returns a proof record with the error
    /// captured; nothing here can undo the merge. Holds no contract lock.
    pub(crate) async fn anchor_merged_version(&self, version: VersionId) -> OnchainProof {
        let (content_ref, author) = {
            let state = self.state.read().await;
            match state.versions.get(&version) {
                Some(row) => (row.content_ref.clone(), row.author_id),
                None => {
                    return OnchainProof {
                        content_hash: None,
                        tx_hash: None,
                        error: Some("version not found".to_string()),
                    }
                }
            }
        };

        let content = match self.store.get_text(&content_ref).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(version = %version, error = %e, "content unavailable for proof");
                return OnchainProof {
                    content_hash: None,
                    tx_hash: None,
                    error: Some(e.to_string()),
                };
            }
        };

        let content_hash = sha256_hex(content.as_bytes());
        {
            // The local hash is persisted even when on-chain anchoring fails.
            let mut state = self.state.write().await;
            if let Some(row) = state.versions.get_mut(&version) {
                row.content_hash = Some(content_hash.clone());
            }
        }

        let signer = match &self.signer {
            Some(signer) => signer.clone(),
            None => {
                tracing::warn!(version = %version, "signer not configured, skipping on-chain proof");
                return OnchainProof {
                    content_hash: Some(content_hash),
                    tx_hash: None,
                    error: None,
                };
            }
        };

        // Proofs attribute the original author, not whoever merged.
        let attributed_identity = {
            let state = self.state.read().await;
            state
                .external_identity(author)
                .unwrap_or_else(|| "unknown".to_string())
        };

        match anchor_with_timeout(
            self.ledger.as_ref(),
            &content_hash,
            &attributed_identity,
            &signer,
            self.config.anchor_timeout,
        )
        .await
        {
            Ok(tx_id) => {
                let mut state = self.state.write().await;
                if let Some(row) = state.versions.get_mut(&version) {
                    row.anchor_tx = Some(tx_id.clone());
                }
                tracing::info!(version = %version, tx = %tx_id, "proof anchored");
                OnchainProof {
                    content_hash: Some(content_hash),
                    tx_hash: Some(tx_id),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(version = %version, error = %e, "proof anchoring failed");
                OnchainProof {
                    content_hash: Some(content_hash),
                    tx_hash: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
