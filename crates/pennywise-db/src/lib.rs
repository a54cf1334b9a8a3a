//! # Pennywise DB
//!
//! Account storage for the Pennywise API.
//!
//! [`AccountStore`] is the only way accounts are created, looked up or
//! changed. Two implementations exist:
//!
//! - [`PgAccountStore`]: PostgreSQL via SQLx, used whenever `DATABASE_URL` is set
//! - [`InMemoryAccountStore`]: process-local, used by tests and for running
//!   the API without a database
//!
//! Both enforce the same rules: emails are normalised before every read and
//! write, a normalised email belongs to at most one account, passwords are
//! hashed only on the password-set paths, and a failed login never reveals
//! whether the email exists.
//!
//! # Example
//!
//! ```ignore
//! use pennywise_core::CredentialHasher;
//! use pennywise_db::{AccountStore, PgAccountStore};
//! use pennywise_models::NewAccount;
//!
//! let store = PgAccountStore::connect(&database_url, CredentialHasher::new()).await?;
//! let account = store
//!     .create(NewAccount::registration("Ana", "Ana@X.com", "secret1"))
//!     .await?;
//! let same = store.find_by_credentials("ana@x.com", "secret1").await?;
//! assert_eq!(account.id, same.id);
//! ```

pub mod credentials;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;
pub use store::AccountStore;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
