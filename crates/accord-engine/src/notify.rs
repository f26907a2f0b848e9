//! Fire-and-forget lifecycle hooks
//!
//! Notifications are optional and non-blocking: implementations must not
//! fail the operation that triggered them, so the hooks return nothing and
//! the engine awaits them only to preserve ordering within a call.

use crate::records::{InvitationRecord, OnchainProof, VersionRecord};
use accord_core::VersionId;
use async_trait::async_trait;

/// Observer for engine lifecycle events
#[async_trait]
pub trait EngineNotifier: Send + Sync {
    /// A new version was appended to a contract's chain
    async fn version_created(&self, version: &VersionRecord);

    /// A version was merged; `proof` carries whatever anchoring produced
    async fn merge_completed(&self, version_id: VersionId, proof: &OnchainProof);

    /// A membership invitation was created
    async fn invitation_created(&self, invitation: &InvitationRecord);
}

/// Notifier that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl EngineNotifier for NoopNotifier {
    async fn version_created(&self, _version: &VersionRecord) {}

    async fn merge_completed(&self, _version_id: VersionId, _proof: &OnchainProof) {}

    async fn invitation_created(&self, _invitation: &InvitationRecord) {}
}
