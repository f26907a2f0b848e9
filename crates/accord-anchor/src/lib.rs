//! # Accord Anchor - external ledger proof anchoring
//!
//! **Purpose**: Define the narrow interface for appending tamper-evident
//! proof records to an external transaction ledger, plus signer credential
//! handling and the in-memory ledger used in tests.
//!
//! A proof record is a memo string binding a content hash to the original
//! author's external identity. The ledger is slow and occasionally
//! unavailable; callers bound every anchoring attempt with
//! [`anchor_with_timeout`] and treat any failure as an anchoring failure,
//! never as a failure of whatever local commit preceded it. Anchoring has no
//! side effects on caller state when it errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ledger;
mod memory;
mod signer;

pub use error::AnchorError;
pub use ledger::{anchor_with_timeout, proof_memo, LedgerAnchor, VerifyOutcome};
pub use memory::{AnchoredProof, MemoryLedgerAnchor};
pub use signer::SignerCredential;
