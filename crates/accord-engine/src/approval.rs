//! The approval state machine
//!
//! One vote row per (version, member); a resubmitted vote overwrites the
//! prior row. The aggregate is a pure function of the tallies, and the
//! auto-merge trigger is strict unanimity among the contract's current
//! members, evaluated at vote time. Vote upsert, recompute, and the
//! unanimity check run under the contract's mutex so two near-simultaneous
//! final votes cannot both skip (or both attempt) the merge.

use crate::engine::ContractEngine;
use crate::records::{ApprovalList, ApprovalRecord, VoteOutcome};
use crate::state::ApprovalRow;
use accord_core::{
    AccordError, ApprovalId, ApprovalStatus, ContractId, Result, UserId, VersionId, Vote,
};
use chrono::Utc;

/// Derive the aggregate status from the tallies.
///
/// Any approval outweighs any number of rejections: this is the documented
/// plain-count policy, reproduced exactly. Weights are never aggregated.
pub(crate) fn derive_status(approvals: u32, rejections: u32) -> ApprovalStatus {
    if approvals > 0 {
        ApprovalStatus::Approved
    } else if rejections > 0 {
        ApprovalStatus::Rejected
    } else {
        ApprovalStatus::Pending
    }
}

impl ContractEngine {
    /// Record (or change) a member's vote on a version.
    ///
    /// Preconditions, in order: caller is a member, caller is not the
    /// version's author, version is not already merged. When the vote
    /// completes unanimity the merge fires synchronously and the outcome
    /// reports `auto_merged` with the proof metadata.
    pub async fn submit_vote(
        &self,
        voter: UserId,
        contract: ContractId,
        version: VersionId,
        vote: Vote,
        comment: Option<&str>,
    ) -> Result<VoteOutcome> {
        {
            let state = self.state.read().await;
            state
                .accessible_contract(voter, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
            if !state.is_listed_member(contract, voter) {
                return Err(AccordError::forbidden("Not a member of this contract"));
            }
        }

        // Vote upsert and unanimity check are one serialized step.
        let lock = self.contract_lock(contract).await;
        let guard = lock.lock().await;

        let (outcome, merged_now) = {
            let mut state = self.state.write().await;
            let row = state
                .version_in_contract(contract, version)
                .ok_or_else(|| AccordError::not_found("Version not found"))?;
            if row.author_id == voter {
                return Err(AccordError::forbidden("Cannot vote on own version"));
            }
            if row.merged {
                return Err(AccordError::invalid_state(
                    "Version is already merged; the vote ledger is frozen",
                ));
            }

            let now = Utc::now();
            let approval_id = match state
                .approvals
                .iter_mut()
                .find(|a| a.version_id == version && a.user_id == voter)
            {
                Some(existing) => {
                    existing.vote = vote;
                    existing.comment = comment.map(str::to_string);
                    existing.created_at = now;
                    existing.id
                }
                None => {
                    let id = ApprovalId::new();
                    state.approvals.push(ApprovalRow {
                        id,
                        version_id: version,
                        user_id: voter,
                        vote,
                        comment: comment.map(str::to_string),
                        created_at: now,
                    });
                    id
                }
            };

            let (approvals, rejections) = state.vote_counts(version);
            let total = state.member_count(contract);
            let status = derive_status(approvals, rejections);
            if let Some(row) = state.versions.get_mut(&version) {
                row.approval_status = status;
                row.approval_score = approvals;
            }

            let merged_now = approvals == total && approvals > 0;
            if merged_now {
                crate::merge::promote(&mut state, contract, version);
            }

            let approval = ApprovalRecord {
                id: approval_id,
                version_id: version,
                user_id: voter,
                user_name: state.display_name(voter),
                vote,
                comment: comment.map(str::to_string),
                created_at: now,
            };
            (
                VoteOutcome {
                    approval,
                    approval_count: approvals,
                    rejection_count: rejections,
                    status: if merged_now {
                        ApprovalStatus::Merged
                    } else {
                        status
                    },
                    auto_merged: merged_now,
                    onchain_proof: None,
                },
                merged_now,
            )
        };

        drop(guard);

        tracing::info!(
            contract = %contract,
            version = %version,
            voter = %voter,
            vote = %vote,
            approvals = outcome.approval_count,
            rejections = outcome.rejection_count,
            "vote recorded"
        );

        if merged_now {
            let proof = self.anchor_merged_version(version).await;
            self.notifier.merge_completed(version, &proof).await;
            return Ok(VoteOutcome {
                onchain_proof: Some(proof),
                ..outcome
            });
        }
        Ok(outcome)
    }

    /// The vote ledger for a version plus derived aggregates
    pub async fn list_approvals(
        &self,
        user: UserId,
        contract: ContractId,
        version: VersionId,
    ) -> Result<ApprovalList> {
        let state = self.state.read().await;
        state
            .accessible_contract(user, contract)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        let row = state
            .version_in_contract(contract, version)
            .ok_or_else(|| AccordError::not_found("Version not found"))?;

        let mut approvals: Vec<ApprovalRecord> = state
            .approvals_for(version)
            .map(|a| ApprovalRecord {
                id: a.id,
                version_id: a.version_id,
                user_id: a.user_id,
                user_name: state.display_name(a.user_id),
                vote: a.vote,
                comment: a.comment.clone(),
                created_at: a.created_at,
            })
            .collect();
        approvals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let (approval_count, rejection_count) = state.vote_counts(version);
        Ok(ApprovalList {
            approvals,
            status: row.approval_status,
            approval_count,
            rejection_count,
        })
    }
}
