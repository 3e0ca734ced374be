// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed session token issuance and verification.
//!
//! Tokens are stateless: validity is determined purely by signature and
//! expiry, with no server-side session store. Expiry is the only
//! server-side invalidation mechanism; deactivating an account revokes
//! access because session resolution re-fetches the account record.

use crate::config::SessionSettings;
use crate::error::AppError;
use educoach_common::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Claims embedded in every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id
    pub sub: String,
    /// Username at issuance time
    pub username: String,
    /// Role at issuance time. Authorization does not trust this field;
    /// resolution re-fetches the account and uses its current role.
    pub role: Role,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: u64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: u64,
}

/// Issues and verifies signed session tokens (HS256).
///
/// The signing secret is process-wide and loaded once at startup; a
/// missing secret refuses startup with [`AppError::Config`].
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    /// Build the service from session settings
    pub fn from_settings(session: &SessionSettings) -> Result<Self, AppError> {
        if session.secret.is_empty() {
            return Err(AppError::Config(
                "session secret is not set (EDUCOACH_SESSION__SECRET)".to_string(),
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(session.secret.as_bytes()),
            decoding: DecodingKey::from_secret(session.secret.as_bytes()),
            ttl_secs: session.ttl_secs,
        })
    }

    /// Mint a signed token for the given subject
    pub fn issue(&self, subject_id: Uuid, username: &str, role: Role) -> Result<String, AppError> {
        let iat = unix_now();
        let claims = Claims {
            sub: subject_id.to_string(),
            username: username.to_string(),
            role,
            iat,
            exp: iat + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// Bad signature, tampered payload, and expiry all yield `None`;
    /// an unreadable token is an unauthenticated request, not an error.
    pub fn decode(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "session token rejected");
                None
            },
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
