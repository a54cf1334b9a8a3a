//! Process-local account store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use pennywise_core::serde::normalize_email;
use pennywise_core::{CredentialHasher, Role};
use pennywise_models::{Account, NewAccount, ProfileUpdate};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::credentials::{
    check_credentials, dummy_hash, hash_password, prepare_new_account, prepare_profile_update,
    validate_password,
};
use crate::error::StoreError;
use crate::store::AccountStore;

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
}

/// Account store kept in memory behind one lock.
///
/// The email check and the insert happen under the same write guard, which is
/// what makes duplicate registrations impossible.
#[derive(Debug)]
pub struct InMemoryAccountStore {
    hasher: CredentialHasher,
    dummy_hash: Option<String>,
    accounts: RwLock<Accounts>,
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new(CredentialHasher::new())
    }
}

impl InMemoryAccountStore {
    pub fn new(hasher: CredentialHasher) -> Self {
        Self {
            hasher,
            dummy_hash: dummy_hash(&hasher),
            accounts: RwLock::new(Accounts::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    #[instrument(skip_all, fields(email = %new.email))]
    async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        let new = prepare_new_account(new)?;
        let password_hash = hash_password(self.hasher, &new.password).await?;

        let mut accounts = self.accounts.write().await;
        if accounts.by_email.contains_key(&new.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash,
            role: new.role,
            permissions: new.permissions,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        accounts.by_email.insert(account.email.clone(), account.id);
        accounts.by_id.insert(account.id, account.clone());
        debug!(account_id = %account.id, "Account created");

        Ok(account)
    }

    #[instrument(skip_all)]
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, StoreError> {
        let found = self.find_by_email(email).await?;
        check_credentials(self.hasher, self.dummy_hash.as_deref(), found, password).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_email
            .get(&email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    #[instrument(skip_all, fields(account_id = %id))]
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Account, StoreError> {
        let update = prepare_profile_update(update)?;

        let mut accounts = self.accounts.write().await;
        let Accounts { by_id, by_email } = &mut *accounts;
        let account = by_id.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(email) = update.email.filter(|email| *email != account.email) {
            if by_email.contains_key(&email) {
                return Err(StoreError::DuplicateEmail);
            }
            by_email.remove(&account.email);
            by_email.insert(email.clone(), id);
            account.email = email;
        }
        if let Some(name) = update.name {
            account.name = name;
        }
        account.updated_at = Utc::now();
        account.version += 1;

        Ok(account.clone())
    }

    #[instrument(skip_all, fields(account_id = %id))]
    async fn change_password(&self, id: Uuid, new_password: &str) -> Result<Account, StoreError> {
        validate_password(new_password)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(StoreError::NotFound);
        }
        let password_hash = hash_password(self.hasher, new_password).await?;

        let mut accounts = self.accounts.write().await;
        let account = accounts.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.password_hash = password_hash;
        account.updated_at = Utc::now();
        account.version += 1;

        Ok(account.clone())
    }

    #[instrument(skip_all, fields(account_id = %id, role = %role))]
    async fn set_access(
        &self,
        id: Uuid,
        role: Role,
        permissions: BTreeSet<String>,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.role = role;
        account.permissions = permissions;
        account.updated_at = Utc::now();
        account.version += 1;

        Ok(account.clone())
    }
}
