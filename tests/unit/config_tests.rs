// ==============================
// tests/unit/config_tests.rs
// ==============================
//! Settings defaults and the fatal-misconfiguration path.
use backend_lib::{config::Settings, storage::MemoryAccountStore, AppState};

#[test]
fn default_settings_match_the_documented_contract() {
    let settings = Settings::default();

    // 7-day sessions, named cookie, login throttle of 5 per window
    assert_eq!(settings.session.ttl_secs, 7 * 24 * 60 * 60);
    assert_eq!(settings.session.cookie_name, "educoach_session");
    assert_eq!(settings.login_rate_limit.max_requests, 5);
    assert_eq!(settings.request_rate_limit.max_requests, 100);
}

#[test]
fn missing_session_secret_refuses_startup() {
    // Default settings carry no secret; state construction must fail
    let result = AppState::new(MemoryAccountStore::new(), Settings::default());
    assert!(result.is_err());

    let err = result.err().unwrap();
    assert!(matches!(err, backend_lib::error::AppError::Config(_)));
}

#[tokio::test]
async fn configured_secret_allows_startup() {
    let mut settings = Settings::default();
    settings.session.secret = "a-real-secret".to_string();

    assert!(AppState::new(MemoryAccountStore::new(), settings).is_ok());
}
