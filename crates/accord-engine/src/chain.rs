//! The append-only version chain
//!
//! Tip selection and append run under the contract's mutex, so version
//! numbers are strictly increasing from 1 with no gaps or duplicates even
//! under concurrent submission. A content-store write failure aborts the
//! whole operation before any row is inserted.

use crate::engine::ContractEngine;
use crate::records::{DiffBetween, VersionRecord};
use crate::state::{ApprovalRow, DiffRow, VersionRow};
use accord_core::{
    AccordError, ApprovalId, ApprovalStatus, ContractId, Result, UserId, VersionId, Vote,
};
use accord_diff::{compute_diff, DiffKind, LineDiff};
use chrono::Utc;

impl ContractEngine {
    /// Append a new version to a contract's chain.
    ///
    /// The author's own submission counts as their approval: an auto-approval
    /// row is recorded immediately and the aggregate recomputed, which merges
    /// the version on the spot when the author is the only member.
    pub async fn create_version(
        &self,
        author: UserId,
        contract: ContractId,
        content: &str,
        commit_message: &str,
    ) -> Result<VersionRecord> {
        if content.is_empty() {
            return Err(AccordError::invalid("Content required"));
        }
        {
            let state = self.state.read().await;
            state
                .accessible_contract(author, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        }

        // Serialize tip selection and append per contract.
        let lock = self.contract_lock(contract).await;
        let _guard = lock.lock().await;

        let tip = {
            let state = self.state.read().await;
            state.tip(contract).cloned()
        };

        // Resolve the tip's content for the diff; a failure here is a
        // dependency failure before any mutation.
        let old_content = match &tip {
            Some(tip_row) => self
                .store
                .get_text(&tip_row.content_ref)
                .await
                .map_err(AccordError::from)?,
            None => String::new(),
        };

        // Content store write failure aborts creation entirely.
        let content_ref = self
            .store
            .put(content.as_bytes())
            .await
            .map_err(AccordError::from)?;

        let diff = compute_diff(&old_content, content);
        let now = Utc::now();
        let version_id = VersionId::new();
        let version_number = tip.as_ref().map_or(1, |t| t.version_number + 1);
        let parent_version_id = tip.as_ref().map(|t| t.id);

        let merged_now = {
            let mut state = self.state.write().await;
            state.versions.insert(
                version_id,
                VersionRow {
                    id: version_id,
                    contract_id: contract,
                    version_number,
                    parent_version_id,
                    author_id: author,
                    content_ref,
                    diff_summary: diff.summary(),
                    commit_message: commit_message.to_string(),
                    merged: false,
                    approval_status: ApprovalStatus::Pending,
                    approval_score: 0,
                    content_hash: None,
                    anchor_tx: None,
                    created_at: now,
                },
            );
            if let Some(parent) = parent_version_id {
                state.diffs.push(DiffRow {
                    from_version: parent,
                    to_version: version_id,
                    entries: diff.entries.clone(),
                });
            }

            // Auto-approval: the author's submission is their yes vote.
            state.approvals.push(ApprovalRow {
                id: ApprovalId::new(),
                version_id,
                user_id: author,
                vote: Vote::Approve,
                comment: Some("Auto-approved by author".to_string()),
                created_at: now,
            });

            let (approvals, rejections) = state.vote_counts(version_id);
            let total = state.member_count(contract);
            let status = crate::approval::derive_status(approvals, rejections);
            if let Some(row) = state.versions.get_mut(&version_id) {
                row.approval_status = status;
                row.approval_score = approvals;
            }

            // Single-member contracts reach unanimity at creation time.
            if approvals == total && approvals > 0 {
                crate::merge::promote(&mut state, contract, version_id);
                true
            } else {
                false
            }
        };

        drop(_guard);

        if merged_now {
            let proof = self.anchor_merged_version(version_id).await;
            self.notifier.merge_completed(version_id, &proof).await;
        }

        let row = {
            let state = self.state.read().await;
            state
                .versions
                .get(&version_id)
                .cloned()
                .ok_or_else(|| AccordError::internal("version vanished after insert"))?
        };
        let record = self.resolve_version(row).await?;
        tracing::info!(
            contract = %contract,
            version = %version_id,
            number = version_number,
            "created version"
        );
        self.notifier.version_created(&record).await;
        Ok(record)
    }

    /// All versions of a contract, newest first
    pub async fn list_versions(
        &self,
        user: UserId,
        contract: ContractId,
    ) -> Result<Vec<VersionRecord>> {
        let rows = {
            let state = self.state.read().await;
            state
                .accessible_contract(user, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
            let mut rows: Vec<VersionRow> = state
                .versions
                .values()
                .filter(|v| v.contract_id == contract)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.version_number.cmp(&a.version_number));
            rows
        };
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.resolve_version(row).await?);
        }
        Ok(records)
    }

    /// A single version, access-scoped to its contract
    pub async fn get_version(
        &self,
        user: UserId,
        contract: ContractId,
        version: VersionId,
    ) -> Result<VersionRecord> {
        let row = {
            let state = self.state.read().await;
            state
                .accessible_contract(user, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
            state
                .version_in_contract(contract, version)
                .cloned()
                .ok_or_else(|| AccordError::not_found("Version not found"))?
        };
        self.resolve_version(row).await
    }

    /// Merged versions only, newest first, with proof fields
    pub async fn history(&self, user: UserId, contract: ContractId) -> Result<Vec<VersionRecord>> {
        let rows = {
            let state = self.state.read().await;
            state
                .accessible_contract(user, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
            let mut rows: Vec<VersionRow> = state
                .versions
                .values()
                .filter(|v| v.contract_id == contract && v.merged)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.version_number.cmp(&a.version_number));
            rows
        };
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.resolve_version(row).await?);
        }
        Ok(records)
    }

    /// The line diff between two versions of a contract.
    ///
    /// The pair is ordered by version number, so `from` is always the
    /// earlier version regardless of argument order. A parent/child pair is
    /// served from the diff cached at append time; any other pair is
    /// recomputed from the resolved contents.
    pub async fn diff_between(
        &self,
        user: UserId,
        contract: ContractId,
        a: VersionId,
        b: VersionId,
    ) -> Result<DiffBetween> {
        let (first, second, cached) = {
            let state = self.state.read().await;
            state
                .accessible_contract(user, contract)
                .ok_or_else(|| AccordError::not_found("Contract not found"))?;
            let first = state
                .version_in_contract(contract, a)
                .cloned()
                .ok_or_else(|| AccordError::not_found("Versions not found"))?;
            let second = state
                .version_in_contract(contract, b)
                .cloned()
                .ok_or_else(|| AccordError::not_found("Versions not found"))?;
            let (first, second) = if first.version_number <= second.version_number {
                (first, second)
            } else {
                (second, first)
            };
            let cached = state
                .diffs
                .iter()
                .find(|d| d.from_version == first.id && d.to_version == second.id)
                .map(|d| d.entries.clone());
            (first, second, cached)
        };

        let from = self.resolve_version(first).await?;
        let to = self.resolve_version(second).await?;
        let diff = match cached {
            Some(entries) => {
                let additions = entries.iter().filter(|e| e.kind == DiffKind::Add).count();
                let deletions = entries.len() - additions;
                LineDiff {
                    entries,
                    additions,
                    deletions,
                }
            }
            None => compute_diff(&from.content, &to.content),
        };
        Ok(DiffBetween {
            from,
            to,
            summary: diff.summary(),
            entries: diff.entries,
        })
    }
}
