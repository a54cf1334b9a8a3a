//! Account store error types

use pennywise_core::{AppError, FieldError, HashingError};
use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Returned for both an unknown email and a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not found")]
    NotFound,

    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn invalid(field: &str, message: &str) -> Self {
        StoreError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(fields) => AppError::validation(fields),
            StoreError::DuplicateEmail => AppError::conflict(err.to_string()),
            StoreError::InvalidCredentials => AppError::unauthorized(INVALID_CREDENTIALS),
            StoreError::NotFound => AppError::not_found(err.to_string()),
            StoreError::Hashing(_)
            | StoreError::Database(_)
            | StoreError::Migration(_)
            | StoreError::Task(_) => AppError::internal(err),
        }
    }
}
