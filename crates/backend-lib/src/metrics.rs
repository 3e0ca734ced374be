// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOGIN_RATE_LIMITED: &str = "auth.login.rate_limited";
pub const LOGOUT: &str = "auth.logout";
pub const SESSION_RESOLVED: &str = "auth.session.resolved";
pub const SESSION_REJECTED: &str = "auth.session.rejected";
pub const REQUEST_RATE_LIMITED: &str = "http.request.rate_limited";
