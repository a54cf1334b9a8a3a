//! PostgreSQL account store.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pennywise_core::serde::normalize_email;
use pennywise_core::{CredentialHasher, Role};
use pennywise_models::{Account, NewAccount, ProfileUpdate};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::credentials::{
    check_credentials, dummy_hash, hash_password, prepare_new_account, prepare_profile_update,
    validate_password,
};
use crate::error::StoreError;
use crate::store::AccountStore;

const MAX_CONNECTIONS: u32 = 5;

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, role, permissions, created_at, updated_at, version";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = sqlx::Error;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            permissions: row.permissions.into_iter().collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}

/// Unique-index violations on `accounts.email` become [`StoreError::DuplicateEmail`].
fn map_write_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateEmail
        }
        _ => StoreError::Database(err),
    }
}

fn into_account(row: Option<AccountRow>) -> Result<Account, StoreError> {
    let row = row.ok_or(StoreError::NotFound)?;
    Ok(Account::try_from(row)?)
}

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
    hasher: CredentialHasher,
    dummy_hash: Option<String>,
}

impl PgAccountStore {
    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str, hasher: CredentialHasher) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");

        Ok(Self::new(pool, hasher))
    }

    pub fn new(pool: PgPool, hasher: CredentialHasher) -> Self {
        Self {
            pool,
            hasher,
            dummy_hash: dummy_hash(&hasher),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip_all, fields(email = %new.email))]
    async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        let new = prepare_new_account(new)?;
        let password_hash = hash_password(self.hasher, &new.password).await?;
        let permissions: Vec<String> = new.permissions.into_iter().collect();

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (id, name, email, password_hash, role, permissions)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&password_hash)
        .bind(new.role.as_str())
        .bind(&permissions)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        let account = Account::try_from(row)?;
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
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::try_from).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::try_from).transpose()?)
    }

    #[instrument(skip_all, fields(account_id = %id))]
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Account, StoreError> {
        let update = prepare_profile_update(update)?;

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW(),
                version = version + 1
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        into_account(row)
    }

    #[instrument(skip_all, fields(account_id = %id))]
    async fn change_password(&self, id: Uuid, new_password: &str) -> Result<Account, StoreError> {
        validate_password(new_password)?;
        let password_hash = hash_password(self.hasher, new_password).await?;

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET password_hash = $2,
                updated_at = NOW(),
                version = version + 1
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await?;

        into_account(row)
    }

    #[instrument(skip_all, fields(account_id = %id, role = %role))]
    async fn set_access(
        &self,
        id: Uuid,
        role: Role,
        permissions: BTreeSet<String>,
    ) -> Result<Account, StoreError> {
        let permissions: Vec<String> = permissions.into_iter().collect();

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET role = $2,
                permissions = $3,
                updated_at = NOW(),
                version = version + 1
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role.as_str())
        .bind(&permissions)
        .fetch_optional(&self.pool)
        .await?;

        into_account(row)
    }
}
