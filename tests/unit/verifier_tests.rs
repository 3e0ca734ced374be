// ==============================
// tests/unit/verifier_tests.rs
// ==============================
//! Credential verification behavior, including the timing-equalizing
//! dummy comparison.
use crate::test_utils::seed_account;
use backend_lib::auth::verify_credentials;
use backend_lib::storage::MemoryAccountStore;
use educoach_common::Role;
use std::time::Instant;

#[tokio::test]
async fn test_correct_credentials_resolve_the_principal() {
    let store = MemoryAccountStore::new();
    let account = seed_account(&store, "ahmet", "correct-pw", Role::Teacher, true).await;

    let principal = verify_credentials(&store, "ahmet", "correct-pw")
        .await
        .unwrap()
        .expect("active account with correct password should verify");

    assert_eq!(principal.id, account.id);
    assert_eq!(principal.username, "ahmet");
    assert_eq!(principal.role, Role::Teacher);
}

#[tokio::test]
async fn test_email_works_as_identifier() {
    let store = MemoryAccountStore::new();
    seed_account(&store, "zeynep", "correct-pw", Role::Parent, true).await;

    let principal = verify_credentials(&store, "zeynep@example.com", "correct-pw")
        .await
        .unwrap();
    assert!(principal.is_some());
}

#[tokio::test]
async fn test_wrong_password_returns_none() {
    let store = MemoryAccountStore::new();
    seed_account(&store, "ahmet", "correct-pw", Role::Teacher, true).await;

    let result = verify_credentials(&store, "ahmet", "wrong-pw").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_unknown_identifier_returns_none() {
    let store = MemoryAccountStore::new();
    let result = verify_credentials(&store, "nobody", "whatever").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_inactive_account_rejected_with_correct_password() {
    let store = MemoryAccountStore::new();
    seed_account(&store, "mehmet", "correct-pw", Role::Student, false).await;

    let result = verify_credentials(&store, "mehmet", "correct-pw").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_unknown_identifier_costs_comparable_time() {
    // Coarse timing parity check: a miss must still pay for a full-cost
    // hash comparison. Generous tolerance to stay robust on loaded CI.
    let store = MemoryAccountStore::new();
    seed_account(&store, "ahmet", "correct-pw", Role::Teacher, true).await;

    let start = Instant::now();
    verify_credentials(&store, "ahmet", "wrong-pw").await.unwrap();
    let known_miss = start.elapsed();

    let start = Instant::now();
    verify_credentials(&store, "no-such-user", "wrong-pw").await.unwrap();
    let unknown_miss = start.elapsed();

    assert!(
        unknown_miss >= known_miss / 5,
        "unknown identifier path returned too fast: {unknown_miss:?} vs {known_miss:?}"
    );
}
