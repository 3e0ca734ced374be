// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the educoach backend and its clients.
//! This module defines account records, resolved principals, and the
//! HTTP request/response payloads of the auth surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an account within the coaching platform
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    /// Stable lowercase name, as stored in tokens and documents
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Persisted account entity backing authentication
/// # Fields
/// * `id` - Stable account identifier
/// * `username` - Unique login name
/// * `email` - Unique email address
/// * `password_hash` - scrypt hash of the account password
/// * `role` - Role granted to the account
/// * `full_name` - Display name shown in the UI
/// * `is_active` - Soft-disable flag; inactive accounts cannot log in
/// * `created_at` - Creation timestamp
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Resolved identity for the current request.
///
/// Derived from a persisted [`AccountRecord`] plus a verified session
/// token; never persisted itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub full_name: String,
}

impl Principal {
    /// Derive a principal from the account's current state
    pub fn from_account(account: &AccountRecord) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
            full_name: account.full_name.clone(),
        }
    }
}

/// Body of `POST /api/auth/login`
/// # Fields
/// * `identifier` - Username or email
/// * `password` - Plaintext password, never logged
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Successful login response
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub principal: Principal,
}

/// Response of `GET /api/auth/me`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MeResponse {
    pub principal: Principal,
}
