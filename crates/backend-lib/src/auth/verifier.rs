// ============================
// crates/backend-lib/src/auth/verifier.rs
// ============================
//! Credential verification against the account store.

use crate::auth::password::{verify_dummy, verify_password};
use crate::error::AppError;
use crate::storage::AccountStore;
use educoach_common::Principal;

/// Verify a submitted identifier/password pair.
///
/// Looks up an account by username or email. When no account matches,
/// an equivalent-cost dummy comparison still runs so the response time
/// does not depend on whether the account exists. Inactive accounts
/// fail verification regardless of the password, after the same
/// comparison cost.
///
/// Returns `None` for any mismatch; the caller maps it to a generic
/// invalid-credentials response. Read-only: no lockout state is
/// recorded here, that is the rate limiter's job.
pub async fn verify_credentials<S: AccountStore + ?Sized>(
    accounts: &S,
    identifier: &str,
    plaintext: &str,
) -> Result<Option<Principal>, AppError> {
    let Some(account) = accounts.find_by_identifier(identifier).await? else {
        verify_dummy(plaintext);
        return Ok(None);
    };

    let password_ok = verify_password(&account.password_hash, plaintext);
    if !password_ok || !account.is_active {
        return Ok(None);
    }

    Ok(Some(Principal::from_account(&account)))
}
