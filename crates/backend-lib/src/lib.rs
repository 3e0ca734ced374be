// ============================
// educoach-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the educoach auth backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod storage;
pub mod validation;

use crate::auth::{CounterStore, MemoryCounterStore, RateLimiter, TokenService};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::FlatFileAccountStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Account storage backend
    pub accounts: S,
    /// Settings loaded at startup
    pub settings: Arc<Settings>,
    /// Session token service
    pub tokens: TokenService,
    /// Rate limiter for login attempts, keyed by client IP
    pub login_limiter: RateLimiter,
    /// Coarse rate limiter for all requests
    pub request_limiter: RateLimiter,
}

impl<S> AppState<S> {
    /// Create application state with the in-process counter store and
    /// its periodic cleanup task.
    ///
    /// Fails with [`AppError::Config`] when the session secret is
    /// missing, which refuses startup.
    pub fn new(accounts: S, config: Settings) -> Result<Self, AppError> {
        let counters = Arc::new(MemoryCounterStore::new());
        let retention = config
            .login_rate_limit
            .window()
            .max(config.request_rate_limit.window());

        let state = Self::with_counter_store(accounts, config, counters.clone())?;
        counters.start_cleanup_task(retention);
        Ok(state)
    }

    /// Create application state over an explicit counter store.
    ///
    /// The in-process store enforces limits per instance only; inject an
    /// external atomic-increment store to share limits across a
    /// horizontally scaled deployment. Injected stores manage their own
    /// expiry and eviction.
    pub fn with_counter_store(
        accounts: S,
        config: Settings,
        counters: Arc<dyn CounterStore>,
    ) -> Result<Self, AppError> {
        let tokens = TokenService::from_settings(&config.session)?;

        let login_limiter = RateLimiter::new(
            counters.clone(),
            "login",
            config.login_rate_limit.max_requests,
            config.login_rate_limit.window(),
        );
        let request_limiter = RateLimiter::new(
            counters,
            "http",
            config.request_rate_limit.max_requests,
            config.request_rate_limit.window(),
        );

        Ok(Self {
            accounts,
            settings: Arc::new(config),
            tokens,
            login_limiter,
            request_limiter,
        })
    }
}

impl AppState<FlatFileAccountStore> {
    /// Create application state with flat-file accounts under the
    /// configured data directory
    pub fn new_flat_file(config: Settings) -> Result<Self, AppError> {
        let accounts = FlatFileAccountStore::new(&config.data_dir)
            .map_err(|e| AppError::Store(e.to_string()))?;
        Self::new(accounts, config)
    }
}
