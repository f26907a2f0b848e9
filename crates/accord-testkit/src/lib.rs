//! # Accord Testkit - fixtures and failure-injection doubles
//!
//! Shared scaffolding for engine tests: a wired-up [`TestEnv`] over the
//! in-memory collaborators, a deterministic signer credential, and doubles
//! that fail on demand to exercise dependency-failure paths.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod doubles;
mod env;

pub use doubles::{FailingContentStore, FailingLedgerAnchor, FlakyContentStore, RecordingNotifier};
pub use env::{test_signer, TestEnv};
