//! The contract engine: wiring, collaborator handles, and serialization
//! boundaries
//!
//! One [`ContractEngine`] owns all engine state plus handles to the external
//! collaborators. A per-contract mutex (acquired through
//! [`ContractEngine::contract_lock`]) serializes every mutating sequence on
//! a contract; the state `RwLock` itself is only ever held for short reads
//! and writes, never across an await on a collaborator.

use crate::config::EngineConfig;
use crate::notify::{EngineNotifier, NoopNotifier};
use crate::records::{MemberRecord, VersionRecord};
use crate::state::{EngineState, UserProfile, VersionRow};
use accord_anchor::{LedgerAnchor, SignerCredential, VerifyOutcome};
use accord_core::{AccordError, ContractId, Result, TxId, UserId};
use accord_store::ContentStore;
use async_lock::{Mutex, RwLock};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Profile data for registering a user with the engine's directory
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Optional email, matched against email invitations
    pub email: Option<String>,
    /// Optional external wallet/identity address for proof attribution
    pub external_identity: Option<String>,
}

impl NewUser {
    /// Convenience constructor with just a display name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            external_identity: None,
        }
    }

    /// Attach an email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach an external identity address
    pub fn with_external_identity(mut self, identity: impl Into<String>) -> Self {
        self.external_identity = Some(identity.into());
        self
    }
}

/// Membership queries consumed for authorization and the unanimity
/// denominator
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// Members of a contract with their voting weights
    async fn list_members(&self, contract: ContractId) -> Result<Vec<MemberRecord>>;

    /// Whether the user is a listed member
    async fn is_member(&self, contract: ContractId, user: UserId) -> bool;

    /// Whether the user created the contract
    async fn is_creator(&self, contract: ContractId, user: UserId) -> bool;
}

/// The contract lifecycle engine
pub struct ContractEngine {
    pub(crate) config: EngineConfig,
    pub(crate) store: Arc<dyn ContentStore>,
    pub(crate) ledger: Arc<dyn LedgerAnchor>,
    pub(crate) signer: Option<SignerCredential>,
    pub(crate) notifier: Arc<dyn EngineNotifier>,
    pub(crate) state: RwLock<EngineState>,
    contract_locks: Mutex<HashMap<ContractId, Arc<Mutex<()>>>>,
}

impl ContractEngine {
    /// Create an engine over the given collaborators
    pub fn new(store: Arc<dyn ContentStore>, ledger: Arc<dyn LedgerAnchor>) -> Self {
        Self {
            config: EngineConfig::default(),
            store,
            ledger,
            signer: None,
            notifier: Arc::new(NoopNotifier),
            state: RwLock::new(EngineState::default()),
            contract_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Override the default configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure the signer credential used for proof anchoring.
    ///
    /// Without a signer, merges still succeed and persist the content hash;
    /// anchoring is skipped with a warning.
    pub fn with_signer(mut self, signer: SignerCredential) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Attach a lifecycle notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn EngineNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a user with the directory, returning their id
    pub async fn register_user(&self, user: NewUser) -> UserId {
        let id = UserId::new();
        let mut state = self.state.write().await;
        state.users.insert(
            id,
            UserProfile {
                name: user.name,
                email: user.email,
                external_identity: user.external_identity,
            },
        );
        id
    }

    /// Check a previously anchored proof against the ledger.
    ///
    /// Never fails: an unreachable ledger reports `exists == false` with the
    /// error populated.
    pub async fn verify_proof(&self, tx_id: &TxId) -> VerifyOutcome {
        self.ledger.verify(tx_id).await
    }

    /// The per-contract mutex serializing tip-selection+append and
    /// vote-upsert+recompute+promote for one contract.
    pub(crate) async fn contract_lock(&self, contract: ContractId) -> Arc<Mutex<()>> {
        let mut locks = self.contract_locks.lock().await;
        locks
            .entry(contract)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Resolve a version row into its public record, fetching content from
    /// the store.
    pub(crate) async fn resolve_version(&self, row: VersionRow) -> Result<VersionRecord> {
        let content = self
            .store
            .get_text(&row.content_ref)
            .await
            .map_err(AccordError::from)?;
        let author_name = {
            let state = self.state.read().await;
            state.display_name(row.author_id)
        };
        Ok(VersionRecord {
            id: row.id,
            contract_id: row.contract_id,
            version_number: row.version_number,
            parent_version_id: row.parent_version_id,
            author_id: row.author_id,
            author_name,
            content,
            content_ref: row.content_ref,
            diff_summary: row.diff_summary,
            commit_message: row.commit_message,
            merged: row.merged,
            approval_status: row.approval_status,
            approval_score: row.approval_score,
            content_hash: row.content_hash,
            anchor_tx: row.anchor_tx,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl MembershipProvider for ContractEngine {
    async fn list_members(&self, contract: ContractId) -> Result<Vec<MemberRecord>> {
        let state = self.state.read().await;
        if !state.contracts.contains_key(&contract) {
            return Err(AccordError::not_found("Contract not found"));
        }
        Ok(state
            .members_of(contract)
            .map(|m| MemberRecord {
                contract_id: m.contract_id,
                user_id: m.user_id,
                name: state.display_name(m.user_id),
                role: m.role.clone(),
                weight: m.weight,
                added_at: m.added_at,
            })
            .collect())
    }

    async fn is_member(&self, contract: ContractId, user: UserId) -> bool {
        self.state.read().await.is_listed_member(contract, user)
    }

    async fn is_creator(&self, contract: ContractId, user: UserId) -> bool {
        self.state.read().await.is_creator(contract, user)
    }
}
