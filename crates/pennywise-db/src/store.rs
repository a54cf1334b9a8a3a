use std::collections::BTreeSet;

use async_trait::async_trait;
use pennywise_core::Role;
use pennywise_models::{Account, NewAccount, ProfileUpdate};
use uuid::Uuid;

use crate::error::StoreError;

/// Durable holder of account records keyed by normalised email.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Validates, hashes the password and inserts the account.
    ///
    /// Of two concurrent creations with the same normalised email exactly one
    /// succeeds; the other fails with [`StoreError::DuplicateEmail`].
    async fn create(&self, new: NewAccount) -> Result<Account, StoreError>;

    /// Looks the account up by normalised email and verifies the password.
    ///
    /// Fails with [`StoreError::InvalidCredentials`] whether the email is
    /// unknown or the password is wrong.
    async fn find_by_credentials(&self, email: &str, password: &str)
    -> Result<Account, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Changes name and/or email. Never touches the credential hash.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
    -> Result<Account, StoreError>;

    /// The only path that re-hashes a credential after registration.
    async fn change_password(&self, id: Uuid, new_password: &str) -> Result<Account, StoreError>;

    async fn set_access(
        &self,
        id: Uuid,
        role: Role,
        permissions: BTreeSet<String>,
    ) -> Result<Account, StoreError>;
}
