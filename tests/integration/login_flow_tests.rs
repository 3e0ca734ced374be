// ==============================
// tests/integration/login_flow_tests.rs
// ==============================
//! End-to-end auth flow through the HTTP router: login, session
//! resolution, throttling, logout.
use crate::test_utils::{seed_account, setup_state, test_settings, FailingCounterStore};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use backend_lib::routes;
use backend_lib::storage::MemoryAccountStore;
use backend_lib::AppState;
use educoach_common::Role;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with_teacher() -> Router {
    let state = setup_state();
    seed_account(&state.accounts, "ahmet", "correct-pw", Role::Teacher, true).await;
    routes::create_router(state)
}

fn login_request(identifier: &str, password: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-real-ip", ip)
        .body(Body::from(
            json!({ "identifier": identifier, "password": password }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pull the raw token out of a `Set-Cookie` header value
fn cookie_token(set_cookie: &str) -> &str {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, v)| v)
        .unwrap()
}

#[tokio::test]
async fn test_login_sets_session_cookie_and_returns_principal() {
    let app = app_with_teacher().await;

    let response = app
        .oneshot(login_request("ahmet", "correct-pw", "10.1.1.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("educoach_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!cookie_token(&set_cookie).is_empty());

    let body = body_json(response).await;
    assert_eq!(body["principal"]["username"], "ahmet");
    assert_eq!(body["principal"]["role"], "teacher");
}

#[tokio::test]
async fn test_bad_credentials_share_one_generic_response() {
    let app = app_with_teacher().await;

    // Wrong password for an existing account
    let wrong_pw = app
        .clone()
        .oneshot(login_request("ahmet", "wrong-pw", "10.1.2.1"))
        .await
        .unwrap();
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw_body = body_json(wrong_pw).await;

    // Identifier that matches no account
    let unknown = app
        .oneshot(login_request("no-such-user", "wrong-pw", "10.1.2.2"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = body_json(unknown).await;

    // Neither response reveals which part of the credentials was wrong
    assert_eq!(wrong_pw_body["error"]["code"], unknown_body["error"]["code"]);
    assert_eq!(
        wrong_pw_body["error"]["message"],
        unknown_body["error"]["message"]
    );
}

#[tokio::test]
async fn test_sixth_login_attempt_is_throttled_per_ip() {
    let app = app_with_teacher().await;

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(login_request("ahmet", "wrong-pw", "10.1.3.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let throttled = app
        .clone()
        .oneshot(login_request("ahmet", "correct-pw", "10.1.3.1"))
        .await
        .unwrap();
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another client is unaffected
    let other = app
        .oneshot(login_request("ahmet", "correct-pw", "10.1.3.2"))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_counter_store_outage_answers_service_unavailable() {
    // Fail-closed end to end: with the counter store down, requests are
    // rejected rather than admitted unthrottled
    let state = Arc::new(
        AppState::with_counter_store(
            MemoryAccountStore::new(),
            test_settings(),
            Arc::new(FailingCounterStore),
        )
        .unwrap(),
    );
    let app = routes::create_router(state);

    let response = app
        .oneshot(login_request("ahmet", "correct-pw", "10.1.5.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_me_round_trips_the_login_identity() {
    let app = app_with_teacher().await;

    let login = app
        .clone()
        .oneshot(login_request("ahmet", "correct-pw", "10.1.4.1"))
        .await
        .unwrap();
    let set_cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let token = cookie_token(&set_cookie);

    let me = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("educoach_session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);

    let body = body_json(me).await;
    assert_eq!(body["principal"]["username"], "ahmet");
    assert_eq!(body["principal"]["role"], "teacher");
}

#[tokio::test]
async fn test_me_without_cookie_is_unauthorized() {
    let app = app_with_teacher().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_the_session_cookie() {
    let app = app_with_teacher().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("educoach_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}
