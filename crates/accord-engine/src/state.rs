//! Internal engine state: rows and access-scoped queries
//!
//! The row structs mirror the persisted schema; everything here is behind
//! the engine's `RwLock` and never leaves the crate. Access scoping lives
//! here so every operation resolves contracts the same way: absent and
//! inaccessible are indistinguishable to the caller.

use accord_core::{
    ApprovalId, ApprovalStatus, CommentId, ContentRef, ContractId, ContractStatus, InvitationId,
    InvitationStatus, TxId, UserId, VersionId, Vote,
};
use accord_diff::DiffEntry;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A registered user profile, keyed by [`UserId`] in the directory map
/// (directory data consumed for display names and proof attribution).
#[derive(Debug, Clone)]
pub(crate) struct UserProfile {
    pub name: String,
    pub email: Option<String>,
    /// External wallet/identity address used in anchored proof payloads
    pub external_identity: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ContractRow {
    pub id: ContractId,
    pub title: String,
    pub description: Option<String>,
    pub status: ContractStatus,
    pub current_version: Option<VersionId>,
    pub external_ref: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct MemberRow {
    pub contract_id: ContractId,
    pub user_id: UserId,
    pub role: String,
    pub weight: f64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct VersionRow {
    pub id: VersionId,
    pub contract_id: ContractId,
    pub version_number: u32,
    pub parent_version_id: Option<VersionId>,
    pub author_id: UserId,
    pub content_ref: ContentRef,
    pub diff_summary: String,
    pub commit_message: String,
    pub merged: bool,
    pub approval_status: ApprovalStatus,
    pub approval_score: u32,
    pub content_hash: Option<String>,
    pub anchor_tx: Option<TxId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct ApprovalRow {
    pub id: ApprovalId,
    pub version_id: VersionId,
    pub user_id: UserId,
    pub vote: Vote,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Cached diff between two specific versions; an immutable audit artifact.
#[derive(Debug, Clone)]
pub(crate) struct DiffRow {
    pub from_version: VersionId,
    pub to_version: VersionId,
    pub entries: Vec<DiffEntry>,
}

#[derive(Debug, Clone)]
pub(crate) struct InvitationRow {
    pub id: InvitationId,
    pub contract_id: ContractId,
    pub email: Option<String>,
    pub external_identity: Option<String>,
    pub role: String,
    pub weight: f64,
    pub token: String,
    pub invited_by: UserId,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentRow {
    pub id: CommentId,
    pub version_id: VersionId,
    pub user_id: UserId,
    pub body: String,
    pub parent_comment_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
}

/// All engine tables. Vectors keep insertion order, which doubles as
/// creation order for approvals and comments.
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub users: HashMap<UserId, UserProfile>,
    pub contracts: HashMap<ContractId, ContractRow>,
    pub members: Vec<MemberRow>,
    pub versions: HashMap<VersionId, VersionRow>,
    pub approvals: Vec<ApprovalRow>,
    pub diffs: Vec<DiffRow>,
    pub invitations: HashMap<InvitationId, InvitationRow>,
    pub comments: Vec<CommentRow>,
}

impl EngineState {
    /// Resolve a contract the user can see: creator or listed member.
    /// Absent and inaccessible both come back `None`.
    pub fn accessible_contract(&self, user: UserId, id: ContractId) -> Option<&ContractRow> {
        let contract = self.contracts.get(&id)?;
        if contract.created_by == user || self.is_listed_member(id, user) {
            Some(contract)
        } else {
            None
        }
    }

    /// Whether the user appears in the member table for the contract
    pub fn is_listed_member(&self, contract: ContractId, user: UserId) -> bool {
        self.members
            .iter()
            .any(|m| m.contract_id == contract && m.user_id == user)
    }

    /// Whether the user created the contract
    pub fn is_creator(&self, contract: ContractId, user: UserId) -> bool {
        self.contracts
            .get(&contract)
            .is_some_and(|c| c.created_by == user)
    }

    /// Current member count; the unanimity denominator is always evaluated
    /// at vote time, never frozen at version creation.
    pub fn member_count(&self, contract: ContractId) -> u32 {
        self.members
            .iter()
            .filter(|m| m.contract_id == contract)
            .count() as u32
    }

    /// Members of a contract in join order
    pub fn members_of(&self, contract: ContractId) -> impl Iterator<Item = &MemberRow> {
        self.members.iter().filter(move |m| m.contract_id == contract)
    }

    /// Chain tip: the version with the highest number for the contract
    pub fn tip(&self, contract: ContractId) -> Option<&VersionRow> {
        self.versions
            .values()
            .filter(|v| v.contract_id == contract)
            .max_by_key(|v| v.version_number)
    }

    /// A version scoped to its contract
    pub fn version_in_contract(
        &self,
        contract: ContractId,
        version: VersionId,
    ) -> Option<&VersionRow> {
        self.versions
            .get(&version)
            .filter(|v| v.contract_id == contract)
    }

    /// Vote rows for a version in insertion order
    pub fn approvals_for(&self, version: VersionId) -> impl Iterator<Item = &ApprovalRow> {
        self.approvals.iter().filter(move |a| a.version_id == version)
    }

    /// Approve/reject tallies for a version
    pub fn vote_counts(&self, version: VersionId) -> (u32, u32) {
        let mut approvals = 0;
        let mut rejections = 0;
        for row in self.approvals_for(version) {
            match row.vote {
                Vote::Approve => approvals += 1,
                Vote::Reject => rejections += 1,
            }
        }
        (approvals, rejections)
    }

    /// Display name for a user, falling back to the id for unregistered ones
    pub fn display_name(&self, user: UserId) -> String {
        self.users
            .get(&user)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| user.to_string())
    }

    /// External identity for proof attribution, if the user registered one
    pub fn external_identity(&self, user: UserId) -> Option<String> {
        self.users.get(&user).and_then(|u| u.external_identity.clone())
    }
}
