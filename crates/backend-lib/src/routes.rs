// ============================
// educoach-backend-lib/src/routes.rs
// ============================
//! HTTP router and auth handlers.
//!
//! Cookie attributes and status codes live here; the auth components
//! themselves stay HTTP-free.

use crate::auth::{resolve_session, verify_credentials};
use crate::config::SessionSettings;
use crate::error::AppError;
use crate::metrics as metric_keys;
use crate::middleware::{self, client_key};
use crate::storage::AccountStore;
use crate::validation;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use educoach_common::{LoginRequest, LoginResponse, MeResponse};
use metrics::counter;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the HTTP router
pub fn create_router<S: AccountStore + Clone + Send + Sync + 'static>(
    state: Arc<AppState<S>>,
) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::<S>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `Set-Cookie` value storing the session token.
///
/// HttpOnly + SameSite=Lax + Max-Age equal to the token ttl, with
/// `Secure` added when configured for production.
fn session_cookie(session: &SessionSettings, token: &str) -> String {
    let mut cookie = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session.cookie_name, session.ttl_secs
    );
    if session.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session cookie
fn clear_session_cookie(session: &SessionSettings) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        session.cookie_name
    );
    if session.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Handler for `POST /api/auth/login`
async fn login<S: AccountStore + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    validation::validate_identifier(&body.identifier)?;

    // Throttle before touching the account store; the limiter fails
    // closed when its counter store errors.
    let key = client_key(&headers);
    let decision = state.login_limiter.admit(&key).await?;
    if decision.limited {
        counter!(metric_keys::LOGIN_RATE_LIMITED).increment(1);
        return Err(AppError::AuthRateLimited);
    }

    let Some(principal) =
        verify_credentials(&state.accounts, &body.identifier, &body.password).await?
    else {
        counter!(metric_keys::LOGIN_FAILURE).increment(1);
        tracing::info!(client = %key, "login failed");
        return Err(AppError::InvalidCredentials);
    };

    let token = state
        .tokens
        .issue(principal.id, &principal.username, principal.role)?;

    counter!(metric_keys::LOGIN_SUCCESS).increment(1);
    tracing::info!(username = %principal.username, role = %principal.role, "login succeeded");

    let cookie = session_cookie(&state.settings.session, &token);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse { principal }),
    )
        .into_response())
}

/// Handler for `POST /api/auth/logout`.
///
/// Clears the cookie; the token itself stays valid until expiry since
/// there is no server-side revocation list.
async fn logout<S: AccountStore + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Response {
    counter!(metric_keys::LOGOUT).increment(1);
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.settings.session))]),
    )
        .into_response()
}

/// Handler for `GET /api/auth/me`
async fn me<S: AccountStore + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, AppError> {
    let principal = resolve_session(
        &state.accounts,
        &state.tokens,
        &headers,
        &state.settings.session.cookie_name,
    )
    .await?;

    match principal {
        Some(principal) => {
            counter!(metric_keys::SESSION_RESOLVED).increment(1);
            Ok(Json(MeResponse { principal }))
        },
        None => {
            counter!(metric_keys::SESSION_REJECTED).increment(1);
            Err(AppError::Auth("no valid session".to_string()))
        },
    }
}
