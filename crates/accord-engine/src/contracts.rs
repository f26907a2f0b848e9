//! Contract creation and management

use crate::engine::ContractEngine;
use crate::records::ContractRecord;
use crate::state::{ApprovalRow, ContractRow, MemberRow, VersionRow};
use accord_core::{
    AccordError, ApprovalId, ApprovalStatus, ContractId, ContractStatus, Result, UserId, VersionId,
    Vote,
};
use chrono::Utc;

/// Template for a freshly created contract document
fn initial_content(title: &str, description: Option<&str>) -> String {
    format!(
        "# {title}\n\n{}\n\n---\n\n## Terms and Conditions\n\nThis contract outlines the terms and conditions for the parties involved.\n\n---\n\n## Signatures\n\n",
        description.unwrap_or("No description provided.")
    )
}

impl ContractEngine {
    /// Create a contract owned by `creator`.
    ///
    /// Seeds the templated initial document as version 1, pre-merged with
    /// the creator's auto-approval, and adds the creator as the first member
    /// with weight 1.0.
    pub async fn create_contract(
        &self,
        creator: UserId,
        title: &str,
        description: Option<&str>,
    ) -> Result<ContractRecord> {
        if title.trim().is_empty() {
            return Err(AccordError::invalid("Contract title required"));
        }

        let content = initial_content(title, description);
        // Content store failure aborts creation before any row exists.
        let content_ref = self
            .store
            .put(content.as_bytes())
            .await
            .map_err(AccordError::from)?;

        let now = Utc::now();
        let contract_id = ContractId::new();
        let version_id = VersionId::new();

        let mut state = self.state.write().await;
        state.contracts.insert(
            contract_id,
            ContractRow {
                id: contract_id,
                title: title.to_string(),
                description: description.map(str::to_string),
                status: ContractStatus::Draft,
                current_version: Some(version_id),
                external_ref: None,
                created_by: creator,
                created_at: now,
                updated_at: now,
            },
        );
        state.members.push(MemberRow {
            contract_id,
            user_id: creator,
            role: "Creator".to_string(),
            weight: 1.0,
            added_at: now,
        });
        state.versions.insert(
            version_id,
            VersionRow {
                id: version_id,
                contract_id,
                version_number: 1,
                parent_version_id: None,
                author_id: creator,
                content_ref,
                diff_summary: "Initial version".to_string(),
                commit_message: "Initial commit".to_string(),
                merged: true,
                approval_status: ApprovalStatus::Merged,
                approval_score: 1,
                content_hash: None,
                anchor_tx: None,
                created_at: now,
            },
        );
        state.approvals.push(ApprovalRow {
            id: ApprovalId::new(),
            version_id,
            user_id: creator,
            vote: Vote::Approve,
            comment: Some("Auto-approved by creator".to_string()),
            created_at: now,
        });

        let record = contract_record(&state, &state.contracts[&contract_id]);
        drop(state);
        tracing::info!(contract = %contract_id, "created contract");
        Ok(record)
    }

    /// Contracts the user created or belongs to, most recently touched first
    pub async fn list_contracts(&self, user: UserId) -> Vec<ContractRecord> {
        let state = self.state.read().await;
        let mut records: Vec<ContractRecord> = state
            .contracts
            .values()
            .filter(|c| c.created_by == user || state.is_listed_member(c.id, user))
            .map(|c| contract_record(&state, c))
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        records
    }

    /// Access-scoped contract fetch
    pub async fn get_contract(&self, user: UserId, id: ContractId) -> Result<ContractRecord> {
        let state = self.state.read().await;
        let contract = state
            .accessible_contract(user, id)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        Ok(contract_record(&state, contract))
    }

    /// Update the lifecycle status of a contract
    pub async fn update_status(
        &self,
        user: UserId,
        id: ContractId,
        status: ContractStatus,
    ) -> Result<ContractRecord> {
        let mut state = self.state.write().await;
        state
            .accessible_contract(user, id)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        let now = Utc::now();
        let contract = state
            .contracts
            .get_mut(&id)
            .ok_or_else(|| AccordError::not_found("Contract not found"))?;
        contract.status = status;
        contract.updated_at = now;
        let record = contract_record(&state, &state.contracts[&id]);
        Ok(record)
    }
}

pub(crate) fn contract_record(
    state: &crate::state::EngineState,
    row: &ContractRow,
) -> ContractRecord {
    ContractRecord {
        id: row.id,
        title: row.title.clone(),
        description: row.description.clone(),
        status: row.status,
        current_version: row.current_version,
        external_ref: row.external_ref.clone(),
        created_by: row.created_by,
        creator_name: state.display_name(row.created_by),
        member_count: state.member_count(row.id) as usize,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
