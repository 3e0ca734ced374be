// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the educoach backend.

pub mod rate_limit;

pub use rate_limit::{client_key, rate_limit};
