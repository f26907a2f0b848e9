//! Failure-injection and recording doubles

use accord_anchor::{AnchorError, LedgerAnchor, SignerCredential, VerifyOutcome};
use accord_core::{ContentRef, TxId, VersionId};
use accord_engine::notify::EngineNotifier;
use accord_engine::records::{InvitationRecord, OnchainProof, VersionRecord};
use accord_store::{ContentStore, MemoryContentStore, StoreError};
use async_lock::Mutex;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Content store that is always unavailable
#[derive(Debug, Default)]
pub struct FailingContentStore;

#[async_trait]
impl ContentStore for FailingContentStore {
    async fn put(&self, _blob: &[u8]) -> Result<ContentRef, StoreError> {
        Err(StoreError::unavailable("injected store failure"))
    }

    async fn get(&self, _reference: &ContentRef) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::unavailable("injected store failure"))
    }
}

/// Content store that works until told to fail
///
/// Lets a test seed content successfully and then inject an outage for the
/// operation under test.
#[derive(Debug, Default)]
pub struct FlakyContentStore {
    inner: MemoryContentStore,
    failing: AtomicBool,
}

impl FlakyContentStore {
    /// Create a working store
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the injected outage
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for FlakyContentStore {
    async fn put(&self, blob: &[u8]) -> Result<ContentRef, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("injected store failure"));
        }
        self.inner.put(blob).await
    }

    async fn get(&self, reference: &ContentRef) -> Result<Vec<u8>, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("injected store failure"));
        }
        self.inner.get(reference).await
    }
}

/// Ledger anchor that always refuses to anchor
#[derive(Debug, Default)]
pub struct FailingLedgerAnchor;

#[async_trait]
impl LedgerAnchor for FailingLedgerAnchor {
    async fn anchor(
        &self,
        _content_hash: &str,
        _attributed_identity: &str,
        _credential: &SignerCredential,
    ) -> Result<TxId, AnchorError> {
        Err(AnchorError::network("injected ledger failure"))
    }

    async fn verify(&self, _tx_id: &TxId) -> VerifyOutcome {
        VerifyOutcome {
            exists: false,
            error: Some("injected ledger failure".to_string()),
        }
    }
}

/// Notifier that records every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    versions: Mutex<Vec<VersionId>>,
    merges: Mutex<Vec<(VersionId, OnchainProof)>>,
    invitations: Mutex<Vec<InvitationRecord>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Version ids announced through `version_created`
    pub async fn created_versions(&self) -> Vec<VersionId> {
        self.versions.lock().await.clone()
    }

    /// Merge completions with their proof records
    pub async fn completed_merges(&self) -> Vec<(VersionId, OnchainProof)> {
        self.merges.lock().await.clone()
    }

    /// Invitations announced through `invitation_created`
    pub async fn created_invitations(&self) -> Vec<InvitationRecord> {
        self.invitations.lock().await.clone()
    }
}

#[async_trait]
impl EngineNotifier for RecordingNotifier {
    async fn version_created(&self, version: &VersionRecord) {
        self.versions.lock().await.push(version.id);
    }

    async fn merge_completed(&self, version_id: VersionId, proof: &OnchainProof) {
        self.merges.lock().await.push((version_id, proof.clone()));
    }

    async fn invitation_created(&self, invitation: &InvitationRecord) {
        self.invitations.lock().await.push(invitation.clone());
    }
}
