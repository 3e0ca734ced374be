// ==============================
// tests/unit/rate_limit_tests.rs
// ==============================
//! This test suite validates the fixed-window `RateLimiter`.
use crate::test_utils::FailingCounterStore;
use backend_lib::auth::{MemoryCounterStore, RateLimiter};
use backend_lib::error::AppError;
use std::sync::Arc;
use std::time::Duration;

fn limiter(max: u32, window: Duration) -> RateLimiter {
    RateLimiter::new(Arc::new(MemoryCounterStore::new()), "login", max, window)
}

#[tokio::test]
async fn test_limiter_admits_up_to_max_requests() {
    let limiter = limiter(5, Duration::from_secs(60));

    // Five requests within the window are all admitted
    for _ in 0..5 {
        let decision = limiter.admit("127.0.0.1").await.unwrap();
        assert!(!decision.limited);
    }
}

#[tokio::test]
async fn test_limiter_blocks_the_sixth_request() {
    let limiter = limiter(5, Duration::from_secs(60));

    for _ in 0..5 {
        limiter.admit("127.0.0.2").await.unwrap();
    }

    let decision = limiter.admit("127.0.0.2").await.unwrap();
    assert!(decision.limited);
}

#[tokio::test]
async fn test_elapsed_window_resets_to_one() {
    let limiter = limiter(2, Duration::from_millis(40));

    limiter.admit("127.0.0.3").await.unwrap();
    limiter.admit("127.0.0.3").await.unwrap();
    assert!(limiter.admit("127.0.0.3").await.unwrap().limited);

    tokio::time::sleep(Duration::from_millis(60)).await;

    // First request of the new window counts as 1 and is admitted
    let decision = limiter.admit("127.0.0.3").await.unwrap();
    assert!(!decision.limited);
    assert_eq!(decision.remaining, 1);
}

#[tokio::test]
async fn test_store_failure_propagates_to_the_caller() {
    // Fail-closed: a broken counter store must reject the request, not
    // wave it through
    let limiter = RateLimiter::new(
        Arc::new(FailingCounterStore),
        "login",
        5,
        Duration::from_secs(60),
    );

    let err = limiter.admit("127.0.0.1").await.unwrap_err();
    assert!(matches!(err, AppError::Store(_)));
}

#[tokio::test]
async fn test_different_clients_tracked_separately() {
    let limiter = limiter(5, Duration::from_secs(60));

    // Exhaust client 1
    for _ in 0..6 {
        limiter.admit("192.168.0.1").await.unwrap();
    }
    assert!(limiter.admit("192.168.0.1").await.unwrap().limited);

    // Client 2 is unaffected
    assert!(!limiter.admit("192.168.0.2").await.unwrap().limited);
}
