//! Version chain integration tests: gapless numbering, parent links, and
//! abort-on-store-failure.

use accord_anchor::{LedgerAnchor, MemoryLedgerAnchor};
use accord_core::{AccordError, ApprovalStatus};
use accord_engine::ContractEngine;
use accord_store::ContentStore;
use accord_testkit::{test_signer, FlakyContentStore, TestEnv};
use std::sync::Arc;

#[tokio::test]
async fn contract_creation_seeds_templated_first_version() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;

    let contract = env
        .engine
        .create_contract(alice, "Service Agreement", Some("Consulting terms"))
        .await
        .unwrap();

    let versions = env.engine.list_versions(alice, contract.id).await.unwrap();
    assert_eq!(versions.len(), 1);

    let first = &versions[0];
    assert_eq!(first.version_number, 1);
    assert!(first.parent_version_id.is_none());
    assert!(first.merged);
    assert_eq!(first.approval_status, ApprovalStatus::Merged);
    assert_eq!(first.diff_summary, "Initial version");
    assert!(first.content.starts_with("# Service Agreement\n"));
    assert!(first.content.contains("Consulting terms"));
    assert_eq!(contract.current_version, Some(first.id));
}

#[tokio::test]
async fn versions_number_sequentially_with_parent_links() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Chain", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let v2 = env
        .engine
        .create_version(alice, contract.id, "draft two", "second draft")
        .await
        .unwrap();
    let v3 = env
        .engine
        .create_version(alice, contract.id, "draft three", "third draft")
        .await
        .unwrap();

    assert_eq!(v2.version_number, 2);
    assert_eq!(v3.version_number, 3);
    assert_eq!(v3.parent_version_id, Some(v2.id));
    assert_eq!(v2.parent_version_id, Some(contract.current_version.unwrap()));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_submissions_stay_gapless() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Busy", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = env.engine.clone();
        let contract_id = contract.id;
        handles.push(tokio::spawn(async move {
            engine
                .create_version(alice, contract_id, &format!("draft {i}"), "wip")
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let versions = env.engine.list_versions(alice, contract.id).await.unwrap();
    let mut numbers: Vec<u32> = versions.iter().map(|v| v.version_number).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=9).collect::<Vec<u32>>());
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let contract = env
        .engine
        .create_contract(alice, "Strict", None)
        .await
        .unwrap();

    let err = env
        .engine
        .create_version(alice, contract.id, "", "empty")
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::Invalid { .. }));
}

#[tokio::test]
async fn store_outage_aborts_without_a_partial_version() {
    let store = Arc::new(FlakyContentStore::new());
    let ledger = Arc::new(MemoryLedgerAnchor::new());
    let engine = ContractEngine::new(
        store.clone() as Arc<dyn ContentStore>,
        ledger as Arc<dyn LedgerAnchor>,
    )
    .with_signer(test_signer());

    let alice = engine
        .register_user(accord_engine::NewUser::named("Alice"))
        .await;
    let bob = engine
        .register_user(accord_engine::NewUser::named("Bob"))
        .await;
    let contract = engine.create_contract(alice, "Flaky", None).await.unwrap();
    engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    store.set_failing(true);
    let err = engine
        .create_version(alice, contract.id, "doomed draft", "wip")
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::Dependency { .. }));

    store.set_failing(false);
    let versions = engine.list_versions(alice, contract.id).await.unwrap();
    assert_eq!(versions.len(), 1);

    // The chain still extends cleanly after the outage.
    let v2 = engine
        .create_version(alice, contract.id, "recovered draft", "retry")
        .await
        .unwrap();
    assert_eq!(v2.version_number, 2);
}

#[tokio::test]
async fn single_member_contract_merges_at_creation() {
    let env = TestEnv::new();
    let alice = env.user_with_identity("Alice", "0xalice").await;
    let contract = env
        .engine
        .create_contract(alice, "Solo", None)
        .await
        .unwrap();

    let v2 = env
        .engine
        .create_version(alice, contract.id, "unilateral edit", "solo change")
        .await
        .unwrap();

    assert!(v2.merged);
    assert_eq!(v2.approval_status, ApprovalStatus::Merged);
    assert!(v2.content_hash.is_some());
    assert!(v2.anchor_tx.is_some());
    assert_eq!(env.ledger.len().await, 1);

    let contract = env.engine.get_contract(alice, contract.id).await.unwrap();
    assert_eq!(contract.current_version, Some(v2.id));
}

#[tokio::test]
async fn diff_between_orders_by_version_number() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "Diffs", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    let base = "clause one\nclause two";
    let v2 = env
        .engine
        .create_version(alice, contract.id, base, "base")
        .await
        .unwrap();
    let v3 = env
        .engine
        .create_version(alice, contract.id, &format!("{base}\nclause three"), "extend")
        .await
        .unwrap();
    assert_eq!(v3.diff_summary, "1 additions, 0 deletions");

    // Argument order does not matter; the parent/child pair is served from
    // the diff cached when v3 was appended.
    let diff = env
        .engine
        .diff_between(alice, contract.id, v3.id, v2.id)
        .await
        .unwrap();
    assert_eq!(diff.from.id, v2.id);
    assert_eq!(diff.to.id, v3.id);
    assert_eq!(diff.summary, v3.diff_summary);
    assert_eq!(diff.summary, "1 additions, 0 deletions");
    assert_eq!(diff.entries.len(), 1);

    // A non-adjacent pair has no cache entry and is recomputed.
    let v1 = env
        .engine
        .list_versions(alice, contract.id)
        .await
        .unwrap()
        .into_iter()
        .find(|v| v.version_number == 1)
        .unwrap();
    let skip = env
        .engine
        .diff_between(alice, contract.id, v1.id, v3.id)
        .await
        .unwrap();
    assert_eq!(skip.from.id, v1.id);
    assert_eq!(skip.to.id, v3.id);
    assert!(!skip.entries.is_empty());
}

#[tokio::test]
async fn history_lists_only_merged_versions() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let bob = env.user("Bob").await;
    let contract = env
        .engine
        .create_contract(alice, "History", None)
        .await
        .unwrap();
    env.engine
        .add_member(alice, contract.id, bob, "Reviewer", 1.0)
        .await
        .unwrap();

    env.engine
        .create_version(alice, contract.id, "pending draft", "wip")
        .await
        .unwrap();

    let history = env.engine.history(alice, contract.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].version_number, 1);
}

#[tokio::test]
async fn non_member_sees_no_contract() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let mallory = env.user("Mallory").await;
    let contract = env
        .engine
        .create_contract(alice, "Private", None)
        .await
        .unwrap();

    let err = env
        .engine
        .get_contract(mallory, contract.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::NotFound { .. }));

    let err = env
        .engine
        .list_versions(mallory, contract.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::NotFound { .. }));
}
