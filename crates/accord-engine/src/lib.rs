//! # Accord Engine - contract lifecycle core
//!
//! **Purpose**: The versioning, approval, and merge workflow for
//! collaboratively drafted contract documents.
//!
//! The engine owns the append-only version chain per contract, the
//! unanimous-approval voting state machine, the auto-merge trigger, and the
//! merge/anchor orchestration that promotes an approved version to canonical
//! and anchors a tamper-evident proof on an external ledger.
//!
//! # Architecture
//!
//! The engine is a library of operations, not a transport layer. External
//! collaborators are consumed through narrow traits:
//!
//! - [`ContentStore`](accord_store::ContentStore) for content-addressed
//!   document storage;
//! - [`LedgerAnchor`](accord_anchor::LedgerAnchor) for proof anchoring;
//! - [`EngineNotifier`] for fire-and-forget lifecycle hooks.
//!
//! # Consistency model
//!
//! A per-contract mutex serializes tip-selection+append and
//! vote-upsert+recompute+promote, so version numbers are gapless under
//! concurrent submission and two final votes cannot race past the unanimity
//! check. Proof anchoring runs after that lock is released: an anchoring
//! failure (unreachable ledger, missing signer, timeout) is captured into
//! the returned proof record and never rolls back or blocks the merge.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod approval;
mod chain;
mod comments;
mod contracts;
mod engine;
mod members;
mod merge;
mod state;

pub mod config;
pub mod notify;
pub mod records;

pub use config::EngineConfig;
pub use engine::{ContractEngine, MembershipProvider, NewUser};
pub use members::InviteSpec;
pub use notify::{EngineNotifier, NoopNotifier};
pub use records::{
    ApprovalList, ApprovalRecord, CommentRecord, ContractRecord, DiffBetween, InvitationRecord,
    MemberRecord, MergeOutcome, OnchainProof, VersionRecord, VoteOutcome,
};
