use crate::storage::AccountStore;
use crate::{error::AppError, metrics as metric_keys, AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use metrics::counter;
use std::sync::Arc;

/// Rate-limit key for a request: the client IP as reported by the
/// reverse proxy, with a shared fallback bucket when the header is
/// missing.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Coarse per-client request cap applied across the router.
///
/// Counter store failures reject the request (fail-closed), surfaced as
/// a 503 through [`AppError::Store`].
pub async fn rate_limit<S: AccountStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(request.headers());

    let decision = state.request_limiter.admit(&key).await?;
    if decision.limited {
        counter!(metric_keys::REQUEST_RATE_LIMITED).increment(1);
        return Err(AppError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}
