// ============================
// educoach-backend-lib/src/storage.rs
// ============================
//! Account persistence abstraction with flat-file and in-memory
//! implementations.
use crate::auth::password::{hash_password_secure, validate_password_strength, PasswordRequirements};
use crate::error::AppError;
use crate::validation;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use educoach_common::{AccountRecord, Role};
use std::{fs, path::{Path, PathBuf}, sync::Arc};
use tokio::fs as tokio_fs;
use uuid::Uuid;

/// Trait for account storage backends
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find an account whose username or email equals `identifier`
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, AppError>;

    /// Find an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError>;

    /// Insert or replace an account record, keyed by id
    async fn upsert(&self, account: AccountRecord) -> Result<(), AppError>;
}

/// Flat-file implementation of the `AccountStore` trait.
///
/// One JSON document per account under `<root>/accounts/<id>.json`.
#[derive(Clone)]
pub struct FlatFileAccountStore {
    root: PathBuf,
}

impl FlatFileAccountStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("accounts"))?;
        Ok(Self { root })
    }

    fn account_path(&self, id: Uuid) -> PathBuf {
        self.root.join("accounts").join(format!("{id}.json"))
    }
}

#[async_trait]
impl AccountStore for FlatFileAccountStore {
    /// Scan the accounts directory for a username or email match
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, AppError> {
        let dir = self.root.join("accounts");
        let mut entries = tokio_fs::read_dir(&dir)
            .await
            .map_err(|e| AppError::Store(format!("reading {}: {e}", dir.display())))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?
        {
            if entry.path().extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let bytes = tokio_fs::read(entry.path())
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
            let account: AccountRecord = serde_json::from_slice(&bytes)?;
            if account.username == identifier || account.email == identifier {
                return Ok(Some(account));
            }
        }

        Ok(None)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError> {
        match tokio_fs::read(self.account_path(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Store(e.to_string())),
        }
    }

    async fn upsert(&self, account: AccountRecord) -> Result<(), AppError> {
        let path = self.account_path(account.id);
        let json = serde_json::to_vec_pretty(&account)?;
        tokio_fs::write(&path, json)
            .await
            .map_err(|e| AppError::Store(format!("writing {}: {e}", path.display())))?;
        Ok(())
    }
}

/// In-memory implementation, for tests and single-process setups
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<DashMap<Uuid, AccountRecord>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, AppError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.username == identifier || a.email == identifier)
            .map(|a| a.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError> {
        Ok(self.accounts.get(&id).map(|a| a.value().clone()))
    }

    async fn upsert(&self, account: AccountRecord) -> Result<(), AppError> {
        self.accounts.insert(account.id, account);
        Ok(())
    }
}

/// Input for account provisioning
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub full_name: String,
}

/// Validate, hash, and persist a new account.
///
/// Rejects duplicate usernames/emails and passwords that fail the
/// complexity requirements.
pub async fn create_account<S: AccountStore + ?Sized>(
    store: &S,
    requirements: &PasswordRequirements,
    new: NewAccount,
) -> Result<AccountRecord, AppError> {
    validation::validate_username(&new.username)?;
    validation::validate_email(&new.email)?;

    if !validate_password_strength(&new.password, requirements) {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {} characters and meet the complexity requirements",
            requirements.min_length
        )));
    }

    if store.find_by_identifier(&new.username).await?.is_some()
        || store.find_by_identifier(&new.email).await?.is_some()
    {
        return Err(AppError::InvalidInput(
            "an account with this username or email already exists".to_string(),
        ));
    }

    let mut password = new.password;
    let password_hash =
        hash_password_secure(&mut password).map_err(|e| AppError::Internal(e.to_string()))?;

    let account = AccountRecord {
        id: Uuid::new_v4(),
        username: new.username,
        email: new.email,
        password_hash,
        role: new.role,
        full_name: new.full_name,
        is_active: true,
        created_at: Utc::now(),
    };
    store.upsert(account.clone()).await?;

    tracing::info!(username = %account.username, role = %account.role, "account created");
    Ok(account)
}
