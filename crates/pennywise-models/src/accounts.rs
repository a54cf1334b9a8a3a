//! Account domain models.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use pennywise_core::{Authorizable, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An account as held by the account store.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Trimmed and lower-cased; unique across all accounts.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub permissions: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every write. Internal only.
    pub version: i64,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Account {
    pub fn public_view(&self) -> AccountPublicView {
        AccountPublicView::from(self)
    }
}

impl Authorizable for Account {
    fn role(&self) -> Role {
        self.role
    }

    fn permissions(&self) -> Option<&BTreeSet<String>> {
        Some(&self.permissions)
    }
}

/// The outward-facing representation of an account.
///
/// Returned by every endpoint and cached by clients as their account snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountPublicView {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub permissions: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountPublicView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            permissions: account.permissions.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl Authorizable for AccountPublicView {
    fn role(&self) -> Role {
        self.role
    }

    fn permissions(&self) -> Option<&BTreeSet<String>> {
        Some(&self.permissions)
    }
}

/// Input for creating an account. The password is still plaintext here.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub permissions: BTreeSet<String>,
}

impl NewAccount {
    /// A regular self-registered account: lowest role, no permissions.
    pub fn registration(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: Role::default(),
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Profile fields an account holder may change. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}
