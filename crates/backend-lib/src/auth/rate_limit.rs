// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Fixed-window rate limiting over an injected counter store.

use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of login attempts admitted per window
const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default window size (15 minutes)
const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// Whether the request exceeds the limit and must be rejected
    pub limited: bool,
    /// Requests remaining in the current window
    pub remaining: u32,
}

/// Atomic per-key counter with a fixed expiry window.
///
/// Injected into [`RateLimiter`] so deployments can choose the backing:
/// the in-process [`MemoryCounterStore`] for a single instance, or an
/// external atomic-increment store when limits must hold across
/// instances. Increments for the same key must be atomic at the store
/// level.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `key`, starting a fresh window when the
    /// previous one has elapsed. Returns the count within the current
    /// window, including this hit.
    async fn incr(&self, key: &str, window: Duration) -> Result<u64, AppError>;
}

/// Counter entry for one key
#[derive(Debug, Clone)]
struct CounterEntry {
    count: u64,
    window_start: Instant,
}

/// In-process counter store backed by a concurrent map.
///
/// Per-instance only: in a horizontally scaled deployment each process
/// enforces its own limits.
#[derive(Debug, Default, Clone)]
pub struct MemoryCounterStore {
    counters: Arc<DashMap<String, CounterEntry>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries whose window elapsed
    pub fn cleanup(&self, window: Duration) {
        let now = Instant::now();
        self.counters
            .retain(|_, entry| now.duration_since(entry.window_start) <= window);
    }

    /// Spawn a background task that periodically drops expired counters.
    ///
    /// Keys derive from client-supplied addresses, so without eviction
    /// the map grows with every distinct address seen.
    pub fn start_cleanup_task(&self, retention: Duration) {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(retention).await;
                store.cleanup(retention);
            }
        });
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str, window: Duration) -> Result<u64, AppError> {
        let now = Instant::now();

        // The entry guard holds the shard lock, making the
        // read-reset-increment sequence atomic per key.
        let mut entry = self
            .counters
            .entry(key.to_string())
            .or_insert_with(|| CounterEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) > window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        Ok(entry.count)
    }
}

/// Fixed-window rate limiter for a class of requests.
///
/// Counters are namespaced by `prefix` so several limiters can share one
/// store without colliding.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    prefix: &'static str,
    max_requests: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryCounterStore::new()),
            "default",
            DEFAULT_MAX_REQUESTS,
            DEFAULT_WINDOW,
        )
    }
}

impl RateLimiter {
    /// Create a new rate limiter over the given counter store
    pub fn new(
        store: Arc<dyn CounterStore>,
        prefix: &'static str,
        max_requests: u32,
        window: Duration,
    ) -> Self {
        Self {
            store,
            prefix,
            max_requests,
            window,
        }
    }

    /// Check and count one request for `client_key`.
    ///
    /// Counter store failures propagate as [`AppError::Store`]; callers
    /// reject the request in that case (fail-closed), since the limiter
    /// guards brute-forceable endpoints.
    pub async fn admit(&self, client_key: &str) -> Result<RateDecision, AppError> {
        let key = format!("{}:{}", self.prefix, client_key);
        let count = self.store.incr(&key, self.window).await?;

        let limited = count > u64::from(self.max_requests);
        let remaining = u64::from(self.max_requests)
            .saturating_sub(count)
            .try_into()
            .unwrap_or(u32::MAX);

        if limited {
            tracing::warn!(prefix = self.prefix, client_key, "rate limit exceeded");
        }

        Ok(RateDecision { limited, remaining })
    }
}
