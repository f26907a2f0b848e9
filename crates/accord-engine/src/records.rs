//! Public record and outcome types returned by engine operations
//!
//! These are the shapes a request layer serializes back to clients. Rows in
//! [`crate::state`] are internal; records resolve foreign keys (author
//! names, content references) into caller-usable form.

use accord_core::{
    ApprovalId, ApprovalStatus, CommentId, ContentRef, ContractId, ContractStatus, InvitationId,
    InvitationStatus, TxId, UserId, VersionId, Vote,
};
use accord_diff::DiffEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contract as seen by a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Contract id
    pub id: ContractId,
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Lifecycle status
    pub status: ContractStatus,
    /// The canonical version, if any
    pub current_version: Option<VersionId>,
    /// Optional external-chain contract identifier
    pub external_ref: Option<String>,
    /// Creator
    pub created_by: UserId,
    /// Creator's display name
    pub creator_name: String,
    /// Number of members
    pub member_count: usize,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

/// A contract member with voting metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Contract the membership belongs to
    pub contract_id: ContractId,
    /// The member
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Role label within the contract
    pub role: String,
    /// Voting weight. Stored and surfaced as passthrough data only; the
    /// approval aggregate is a plain unanimous count.
    pub weight: f64,
    /// When the member was added
    pub added_at: DateTime<Utc>,
}

/// A version snapshot with resolved content and approval metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version id
    pub id: VersionId,
    /// Owning contract
    pub contract_id: ContractId,
    /// 1-based, gapless, per-contract
    pub version_number: u32,
    /// Parent in the chain; `None` only for version 1
    pub parent_version_id: Option<VersionId>,
    /// Author
    pub author_id: UserId,
    /// Author's display name
    pub author_name: String,
    /// Resolved document text
    pub content: String,
    /// Content store reference for the document text
    pub content_ref: ContentRef,
    /// Human-readable delta summary against the parent
    pub diff_summary: String,
    /// Author's commit message
    pub commit_message: String,
    /// Whether the version has been merged
    pub merged: bool,
    /// Aggregate approval status
    pub approval_status: ApprovalStatus,
    /// Count of approve votes
    pub approval_score: u32,
    /// Hex SHA-256 of the content, set at merge time
    pub content_hash: Option<String>,
    /// Ledger transaction id of the anchored proof, if anchoring succeeded
    pub anchor_tx: Option<TxId>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// One member's vote on a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Approval row id
    pub id: ApprovalId,
    /// The version voted on
    pub version_id: VersionId,
    /// The voter
    pub user_id: UserId,
    /// Voter's display name
    pub user_name: String,
    /// The vote
    pub vote: Vote,
    /// Optional comment attached to the vote
    pub comment: Option<String>,
    /// When the vote was last cast or changed
    pub created_at: DateTime<Utc>,
}

/// The vote ledger for a version plus derived aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalList {
    /// All vote rows, newest first
    pub approvals: Vec<ApprovalRecord>,
    /// Current aggregate status
    pub status: ApprovalStatus,
    /// Count of approve votes
    pub approval_count: u32,
    /// Count of reject votes
    pub rejection_count: u32,
}

/// Proof metadata returned by the merge orchestrator.
///
/// `error` is populated when anchoring failed; the merge itself has already
/// succeeded by the time this is produced and is never reverted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnchainProof {
    /// Hex SHA-256 of the merged content, when it could be computed
    pub content_hash: Option<String>,
    /// Ledger transaction id, when anchoring succeeded
    pub tx_hash: Option<TxId>,
    /// Anchoring failure detail, when it did not
    pub error: Option<String>,
}

/// Result of submitting a vote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// The recorded (or overwritten) vote
    pub approval: ApprovalRecord,
    /// Approve count after the vote
    pub approval_count: u32,
    /// Reject count after the vote
    pub rejection_count: u32,
    /// Aggregate status after the vote
    pub status: ApprovalStatus,
    /// Whether this vote completed unanimity and triggered the merge
    pub auto_merged: bool,
    /// Proof metadata when the merge fired
    pub onchain_proof: Option<OnchainProof>,
}

/// Result of merging a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Human-readable outcome message
    pub message: String,
    /// Proof metadata for the merge
    pub onchain_proof: OnchainProof,
}

/// A recomputed diff between two versions of a contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffBetween {
    /// The earlier version (by version number)
    pub from: VersionRecord,
    /// The later version
    pub to: VersionRecord,
    /// Position-aligned diff entries
    pub entries: Vec<DiffEntry>,
    /// Human-readable summary
    pub summary: String,
}

/// A pending or resolved membership invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationRecord {
    /// Invitation id
    pub id: InvitationId,
    /// Target contract
    pub contract_id: ContractId,
    /// Invitee email, if invited by email
    pub email: Option<String>,
    /// Invitee external identity, if invited by identity
    pub external_identity: Option<String>,
    /// Role the invitee will receive
    pub role: String,
    /// Weight the invitee will receive
    pub weight: f64,
    /// Unguessable acceptance token
    pub token: String,
    /// Who sent the invitation
    pub invited_by: UserId,
    /// Current status
    pub status: InvitationStatus,
    /// When the invitation lapses
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A threaded remark on a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Comment id
    pub id: CommentId,
    /// The version commented on
    pub version_id: VersionId,
    /// Commenter
    pub user_id: UserId,
    /// Commenter's display name
    pub user_name: String,
    /// Comment body
    pub body: String,
    /// Parent comment for one-level-deep replies
    pub parent_comment_id: Option<CommentId>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
