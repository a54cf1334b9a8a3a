//! # Pennywise Core
//!
//! Core types, errors, and utilities for the Pennywise API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error envelope with HTTP response conversion
//! - [`password`]: One-way credential hashing and verification
//! - [`roles`]: The ordered account role hierarchy
//! - [`permissions`]: Permission string constants
//! - [`authorization`]: Role and permission predicates
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use pennywise_core::{AppError, AuthorizationGuard, CredentialHasher, Role};
//!
//! let hasher = CredentialHasher::new();
//! let hash = hasher.hash("secret1")?;
//! assert!(hasher.verify("secret1", &hash)?);
//!
//! if !AuthorizationGuard::require_role(&account, Role::Admin) {
//!     return Err(AppError::forbidden("Access denied"));
//! }
//! ```

pub mod authorization;
pub mod errors;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod serde;

// Re-export commonly used types at crate root
pub use authorization::{Authorizable, AuthorizationGuard};
pub use errors::{AppError, ErrorResponse, FieldError};
pub use password::{CredentialHasher, HASH_COST, HashingError};
pub use roles::{Role, UnknownRole};
