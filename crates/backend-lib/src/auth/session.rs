// ============================
// educoach-backend-lib/src/auth/session.rs
// ============================
//! Session resolution from an incoming request's cookie.

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::storage::AccountStore;
use axum::http::{header, HeaderMap};
use educoach_common::Principal;
use uuid::Uuid;

/// Read the value of a named cookie from the `Cookie` header
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Resolve the current principal from the session cookie.
///
/// An absent cookie and an invalid token (bad signature, expired) both
/// resolve to `Ok(None)`: unauthenticated, not an error. A valid token
/// re-fetches the account record, so the principal always reflects the
/// account's current role and active flag; a deactivated account is
/// revoked immediately even though its token has not expired.
pub async fn resolve_session<S: AccountStore + ?Sized>(
    accounts: &S,
    tokens: &TokenService,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<Option<Principal>, AppError> {
    let Some(token) = read_cookie(headers, cookie_name) else {
        return Ok(None);
    };

    let Some(claims) = tokens.decode(token) else {
        return Ok(None);
    };

    let Ok(subject_id) = Uuid::parse_str(&claims.sub) else {
        tracing::debug!("session token carried a malformed subject id");
        return Ok(None);
    };

    let Some(account) = accounts.find_by_id(subject_id).await? else {
        return Ok(None);
    };

    if !account.is_active {
        tracing::debug!(username = %account.username, "session for deactivated account rejected");
        return Ok(None);
    }

    Ok(Some(Principal::from_account(&account)))
}
