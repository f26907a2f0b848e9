//! Approval state machine integration tests: tallies, upserts,
//! authorization, and the unanimity trigger under contention.

use accord_core::{AccordError, ApprovalStatus, Vote};
use accord_testkit::TestEnv;

/// Contract with the creator plus `extra` reviewers; returns the reviewers.
async fn contract_with_members(
    env: &TestEnv,
    creator: accord_core::UserId,
    extra: usize,
) -> (accord_core::ContractId, Vec<accord_core::UserId>) {
    let contract = env
        .engine
        .create_contract(creator, "Reviewed", None)
        .await
        .unwrap();
    let mut members = Vec::new();
    for i in 0..extra {
        let user = env.user(&format!("Reviewer {i}")).await;
        env.engine
            .add_member(creator, contract.id, user, "Reviewer", 1.0)
            .await
            .unwrap();
        members.push(user);
    }
    (contract.id, members)
}

#[tokio::test]
async fn partial_approval_is_approved_but_not_merged() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 2).await;

    let version = env
        .engine
        .create_version(alice, contract, "draft", "for review")
        .await
        .unwrap();
    // Author auto-approval is 1 of 3.
    assert_eq!(version.approval_score, 1);
    assert_eq!(version.approval_status, ApprovalStatus::Approved);
    assert!(!version.merged);

    let outcome = env
        .engine
        .submit_vote(members[0], contract, version.id, Vote::Approve, None)
        .await
        .unwrap();
    assert_eq!(outcome.approval_count, 2);
    assert_eq!(outcome.status, ApprovalStatus::Approved);
    assert!(!outcome.auto_merged);
    assert!(outcome.onchain_proof.is_none());

    let fetched = env.engine.get_version(alice, contract, version.id).await.unwrap();
    assert!(!fetched.merged);
}

#[tokio::test]
async fn final_approval_merges_and_promotes() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 2).await;

    let version = env
        .engine
        .create_version(alice, contract, "draft", "for review")
        .await
        .unwrap();
    env.engine
        .submit_vote(members[0], contract, version.id, Vote::Approve, None)
        .await
        .unwrap();
    let outcome = env
        .engine
        .submit_vote(members[1], contract, version.id, Vote::Approve, Some("ship it"))
        .await
        .unwrap();

    assert!(outcome.auto_merged);
    assert_eq!(outcome.approval_count, 3);
    assert_eq!(outcome.status, ApprovalStatus::Merged);
    let proof = outcome.onchain_proof.unwrap();
    assert!(proof.content_hash.is_some());
    assert!(proof.tx_hash.is_some());
    assert!(proof.error.is_none());

    let contract = env.engine.get_contract(alice, contract).await.unwrap();
    assert_eq!(contract.current_version, Some(version.id));
}

#[tokio::test]
async fn one_approval_outweighs_rejections() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 2).await;

    let version = env
        .engine
        .create_version(alice, contract, "contested draft", "wip")
        .await
        .unwrap();
    let outcome = env
        .engine
        .submit_vote(members[0], contract, version.id, Vote::Reject, Some("needs work"))
        .await
        .unwrap();

    // Author approval (1) and one rejection: approval wins.
    assert_eq!(outcome.approval_count, 1);
    assert_eq!(outcome.rejection_count, 1);
    assert_eq!(outcome.status, ApprovalStatus::Approved);
    assert!(!outcome.auto_merged);
}

#[tokio::test]
async fn revote_overwrites_the_existing_row() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 2).await;
    let bob = members[0];

    let version = env
        .engine
        .create_version(alice, contract, "draft", "wip")
        .await
        .unwrap();
    env.engine
        .submit_vote(bob, contract, version.id, Vote::Reject, Some("not yet"))
        .await
        .unwrap();
    let outcome = env
        .engine
        .submit_vote(bob, contract, version.id, Vote::Approve, Some("fixed"))
        .await
        .unwrap();
    assert_eq!(outcome.approval_count, 2);
    assert_eq!(outcome.rejection_count, 0);

    let list = env
        .engine
        .list_approvals(alice, contract, version.id)
        .await
        .unwrap();
    // One row for the author, one for Bob; no ghost of the rejected vote.
    assert_eq!(list.approvals.len(), 2);
    let bobs: Vec<_> = list.approvals.iter().filter(|a| a.user_id == bob).collect();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].vote, Vote::Approve);
    assert_eq!(bobs[0].comment.as_deref(), Some("fixed"));
    // Newest first: the re-vote leads.
    assert_eq!(list.approvals[0].user_id, bob);
}

#[tokio::test]
async fn author_cannot_vote_on_own_version() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, _) = contract_with_members(&env, alice, 1).await;

    let version = env
        .engine
        .create_version(alice, contract, "draft", "wip")
        .await
        .unwrap();
    let err = env
        .engine
        .submit_vote(alice, contract, version.id, Vote::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::Forbidden { .. }));
}

#[tokio::test]
async fn stranger_cannot_vote() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let mallory = env.user("Mallory").await;
    let (contract, _) = contract_with_members(&env, alice, 1).await;

    let version = env
        .engine
        .create_version(alice, contract, "draft", "wip")
        .await
        .unwrap();
    // Access scoping hides the contract entirely from non-members.
    let err = env
        .engine
        .submit_vote(mallory, contract, version.id, Vote::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::NotFound { .. }));
}

#[tokio::test]
async fn merged_version_freezes_its_vote_ledger() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 1).await;

    let version = env
        .engine
        .create_version(alice, contract, "draft", "wip")
        .await
        .unwrap();
    env.engine
        .submit_vote(members[0], contract, version.id, Vote::Approve, None)
        .await
        .unwrap();

    // A member added after the merge cannot reopen the tally.
    let carol = env.user("Carol").await;
    env.engine
        .add_member(alice, contract, carol, "Reviewer", 1.0)
        .await
        .unwrap();
    let err = env
        .engine
        .submit_vote(carol, contract, version.id, Vote::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccordError::InvalidState { .. }));
}

#[tokio::test]
async fn member_added_mid_vote_raises_the_bar() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 1).await;
    let bob = members[0];

    let version = env
        .engine
        .create_version(alice, contract, "draft", "wip")
        .await
        .unwrap();

    // Unanimity was 2; Carol joins before Bob votes, making it 3.
    let carol = env.user("Carol").await;
    env.engine
        .add_member(alice, contract, carol, "Reviewer", 1.0)
        .await
        .unwrap();

    let outcome = env
        .engine
        .submit_vote(bob, contract, version.id, Vote::Approve, None)
        .await
        .unwrap();
    assert!(!outcome.auto_merged);
    assert_eq!(outcome.approval_count, 2);

    let outcome = env
        .engine
        .submit_vote(carol, contract, version.id, Vote::Approve, None)
        .await
        .unwrap();
    assert!(outcome.auto_merged);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_final_votes_merge_exactly_once() {
    let env = TestEnv::new();
    let alice = env.user("Alice").await;
    let (contract, members) = contract_with_members(&env, alice, 2).await;

    let version = env
        .engine
        .create_version(alice, contract, "draft", "wip")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for member in members {
        let engine = env.engine.clone();
        let version_id = version.id;
        handles.push(tokio::spawn(async move {
            engine
                .submit_vote(member, contract, version_id, Vote::Approve, None)
                .await
        }));
    }
    let mut merged_count = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        if outcome.auto_merged {
            merged_count += 1;
        }
    }

    assert_eq!(merged_count, 1);
    assert_eq!(env.ledger.len().await, 1);
    let fetched = env.engine.get_version(alice, contract, version.id).await.unwrap();
    assert!(fetched.merged);
}
