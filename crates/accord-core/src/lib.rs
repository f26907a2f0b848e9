//! # Accord Core - foundation types
//!
//! **Purpose**: Define the identifier types, domain enums, content hashing,
//! and unified error type shared by every Accord crate.
//!
//! This crate is pure and synchronous: no I/O, no async, no collaborator
//! interfaces. Higher layers (`accord-store`, `accord-anchor`,
//! `accord-engine`) depend on it; it depends on nothing in the workspace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod hash;
pub mod identifiers;
pub mod types;

pub use errors::{AccordError, Result};
pub use hash::sha256_hex;
pub use identifiers::{
    ApprovalId, CommentId, ContentRef, ContractId, InvitationId, TxId, UserId, VersionId,
};
pub use types::{ApprovalStatus, ContractStatus, InvitationStatus, Vote};
