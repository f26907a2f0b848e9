//! Wired-up engine fixture

use accord_anchor::{LedgerAnchor, MemoryLedgerAnchor, SignerCredential};
use accord_core::UserId;
use accord_engine::{ContractEngine, EngineConfig, NewUser};
use accord_store::{ContentStore, MemoryContentStore};
use ed25519_dalek::SigningKey;
use std::sync::Arc;

/// Deterministic signer credential for tests
pub fn test_signer() -> SignerCredential {
    SignerCredential::from_signing_key(SigningKey::from_bytes(&[7u8; 32]))
}

/// An engine wired to the in-memory store and ledger, with handles kept for
/// assertions against the collaborators.
pub struct TestEnv {
    /// The engine under test
    pub engine: Arc<ContractEngine>,
    /// The backing content store
    pub store: Arc<MemoryContentStore>,
    /// The backing proof ledger
    pub ledger: Arc<MemoryLedgerAnchor>,
}

impl TestEnv {
    /// Engine with the deterministic test signer configured
    pub fn new() -> Self {
        Self::build(true, EngineConfig::default())
    }

    /// Engine with no signer configured (anchoring skipped on merge)
    pub fn without_signer() -> Self {
        Self::build(false, EngineConfig::default())
    }

    /// Engine with a custom configuration and the test signer
    pub fn with_config(config: EngineConfig) -> Self {
        Self::build(true, config)
    }

    fn build(signed: bool, config: EngineConfig) -> Self {
        let store = Arc::new(MemoryContentStore::new());
        let ledger = Arc::new(MemoryLedgerAnchor::new());
        let mut engine = ContractEngine::new(
            store.clone() as Arc<dyn ContentStore>,
            ledger.clone() as Arc<dyn LedgerAnchor>,
        )
        .with_config(config);
        if signed {
            engine = engine.with_signer(test_signer());
        }
        Self {
            engine: Arc::new(engine),
            store,
            ledger,
        }
    }

    /// Register a user with just a display name
    pub async fn user(&self, name: &str) -> UserId {
        self.engine.register_user(NewUser::named(name)).await
    }

    /// Register a user with an external identity for proof attribution
    pub async fn user_with_identity(&self, name: &str, identity: &str) -> UserId {
        self.engine
            .register_user(NewUser::named(name).with_external_identity(identity))
            .await
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
