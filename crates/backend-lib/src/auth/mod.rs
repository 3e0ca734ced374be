// ============================
// educoach-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module: password hashing, credential verification,
//! rate limiting, token issuance, and session resolution.

pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token;
pub mod verifier;

pub use password::{hash_password, verify_password, validate_password_strength, PasswordRequirements, MIN_PASSWORD_LENGTH};
pub use rate_limit::{CounterStore, MemoryCounterStore, RateDecision, RateLimiter};
pub use session::{read_cookie, resolve_session};
pub use token::{Claims, TokenService};
pub use verifier::verify_credentials;
