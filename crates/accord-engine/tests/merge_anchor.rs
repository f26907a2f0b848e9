//! Merge/anchor orchestrator integration tests: explicit merges,
//! idempotency, proof attribution, and anchoring failure isolation.

use accord_anchor::{LedgerAnchor, MemoryLedgerAnchor};
use accord_core::{sha256_hex, AccordError, TxId, Vote};
use accord_engine::{ContractEngine, NewUser};
use accord_store::{ContentStore, MemoryContentStore};
use accord_testkit::{test_signer, FailingLedgerAnchor, RecordingNotifier, TestEnv};
use std::sync::Arc;

#[tokio::test]
async fn explicit_merge_of_an_approved_version() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let carol = env.user("Carol").await;
    let contract = env
        .engine
        .create_contract(alice, "Tri-party", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, carol, "Reviewer", 1.0)
        .await
        .unwrap();

    let version = env
        .engine
        .create_version(alice, contract.id, "draft", "for review")
        .await
        .unwrap();
    // 2 of 3: approved, below the auto-merge threshold.
    env.engine
        .submit_vote(bob, contract.id, version.id, Vote::Approve, None)
        .await
        .unwrap();

    let outcome = env
        .engine
        .merge_version(alice, contract.id, version.id)
        .await
        .unwrap();
    assert_eq!(outcome.message, "Version merged successfully");
    assert!(outcome.onchain_proof.tx_hash.is_some());
    assert_eq!(env.ledger.len().await, 1);

    let contract = env.engine.get_contract(alice, contract.id).await.unwrap();
    assert_eq!(contract.current_version, Some(version.id));
}

#[tokio::test]
async fn repeated_merge_is_a_no_op_without_reanchoring() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Twice", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let version = env
        .engine
        .create_version(alice, contract.id, "draft", "wip")
        .await
        .unwrap();
    let first = env
        .engine
        .submit_vote(bob, contract.id, version.id, Vote::Approve, None)
        .await
        .unwrap();
    let first_proof = first.onchain_proof.unwrap();

    let again = env
        .engine
        .merge_version(alice, contract.id, version.id)
        .await
        .unwrap();
    assert_eq!(again.message, "Version already merged");
    assert_eq!(again.onchain_proof.content_hash, first_proof.content_hash);
    assert_eq!(again.onchain_proof.tx_hash, first_proof.tx_hash);
    assert_eq!(env.ledger.len().await, 1);
}

#[tokio::test]
async fn proof_attributes_the_original_author() {
    let env = TestEnv::new();
    let alice = env.user_with_identity("Alice", "0xalice").await;
    let bob = env.user_with_identity("Bob", "0xbob").await;
    let contract = env
        .engine
        .create_contract(alice, "Attributed", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let content = "the agreed text";
    let version = env
        .engine
        .create_version(alice, contract.id, content, "final text")
        .await
        .unwrap();
    // Bob's vote completes unanimity and fires the merge, but the proof
    // still names Alice.
    let outcome = env
        .engine
        .submit_vote(bob, contract.id, version.id, Vote::Approve, None)
        .await
        .unwrap();
    let proof = outcome.onchain_proof.unwrap();
    let expected_hash = sha256_hex(content.as_bytes());
    assert_eq!(proof.content_hash.as_deref(), Some(expected_hash.as_str()));

    let anchored = env.ledger.proof(&proof.tx_hash.unwrap()).await.unwrap();
    assert_eq!(
        anchored.memo,
        format!("AccordProof:{expected_hash}:CreatedBy:0xalice")
    );
}

#[tokio::test]
async fn author_without_identity_is_anchored_as_unknown() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Anonymous", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let version = env
        .engine
        .create_version(alice, contract.id, "text", "wip")
        .await
        .unwrap();
    let outcome = env
        .engine
        .submit_vote(bob, contract.id, version.id, Vote::Approve, None)
        .await
        .unwrap();
    let proof = outcome.onchain_proof.unwrap();
    let anchored = env.ledger.proof(&proof.tx_hash.unwrap()).await.unwrap();
    assert!(anchored.memo.ends_with(":CreatedBy:unknown"));
}

#[tokio::test]
async fn ledger_failure_never_rolls_back_the_merge() {
    let store = Arc::new(MemoryContentStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = ContractEngine::new(
        store as Arc<dyn ContentStore>,
        Arc::new(FailingLedgerAnchor) as Arc<dyn LedgerAnchor>,
    )
    .with_signer(test_signer())
    .with_notifier(notifier.clone());

    let alice = engine.register_user(NewUser::named("Alice")).await;
    let bob = engine.register_user(NewUser::named("Bob")).await;
    let contract = engine
        .create_contract(alice, "Unanchored", None)
        .await
        .unwrap();
    engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let content = "merged despite the outage";
    let version = engine
        .create_version(alice, contract.id, content, "wip")
        .await
        .unwrap();
    let outcome = engine
        .submit_vote(bob, contract.id, version.id, Vote::Approve, None)
        .await
        .unwrap();

    // The merge succeeded and the vote outcome says so.
    assert!(outcome.auto_merged);
    let proof = outcome.onchain_proof.unwrap();
    assert_eq!(
        proof.content_hash.as_deref(),
        Some(sha256_hex(content.as_bytes()).as_str())
    );
    assert!(proof.tx_hash.is_none());
    assert!(proof.error.is_some());

    // The local hash persisted; the tx did not.
    let fetched = engine
        .get_version(alice, contract.id, version.id)
        .await
        .unwrap();
    assert!(fetched.merged);
    assert!(fetched.content_hash.is_some());
    assert!(fetched.anchor_tx.is_none());
    let contract = engine.get_contract(alice, contract.id).await.unwrap();
    assert_eq!(contract.current_version, Some(version.id));

    // Exactly one merge completion was announced, carrying the failed proof.
    let merges = notifier.completed_merges().await;
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].0, version.id);
    assert!(merges[0].1.error.is_some());
}

#[tokio::test]
async fn missing_signer_skips_anchoring_without_error() {
    let env = TestEnv::without_signer();
    let alice = env.user_with_identity("Alice", "0xalice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Unsigned", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let version = env
        .engine
        .create_version(alice, contract.id, "text", "wip")
        .await
        .unwrap();
    let outcome = env
        .engine
        .submit_vote(bob, contract.id, version.id, Vote::Approve, None)
        .await
        .unwrap();

    assert!(outcome.auto_merged);
    let proof = outcome.onchain_proof.unwrap();
    assert!(proof.content_hash.is_some());
    assert!(proof.tx_hash.is_none());
    assert!(proof.error.is_none());
    assert!(env.ledger.is_empty().await);
}

#[tokio::test]
async fn verify_reports_missing_transactions_without_failing() {
    let env = TestEnv::new();
    let outcome = env.engine.verify_proof(&TxId::new("no-such-tx")).await;
    assert!(!outcome.exists);
    assert!(outcome.error.is_some());

    let ledger = MemoryLedgerAnchor::new();
    let tx = ledger
        .anchor("deadbeef", "0xalice", &test_signer())
        .await
        .unwrap();
    assert!(ledger.verify(&tx).await.exists);
}

#[tokio::test]
async fn merge_requires_an_existing_version() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Strict", None)
        .await
        .unwrap();
    let other = env
        .engine
        .create_contract(alice, "Other", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    // A version belonging to another contract is not reachable here.
    let foreign = env
        .engine
        .list_versions(alice, other.id)
        .await
        .unwrap()
        .remove(0);
    let err = env
        .engine
        .merge_version(alice, contract.id, foreign.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::NotFound { .. }));
}
