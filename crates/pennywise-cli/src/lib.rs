//! # Pennywise CLI
//!
//! Account administration commands that bypass the HTTP API, used to create
//! the first privileged account and to grant roles and permissions.
//!
//! ## Usage
//!
//! ```ignore
//! use pennywise_cli::admin::{create_admin, grant};
//!
//! let admin = create_admin(&store, "Root", "root@x.com", "secret1", Role::SuperAdmin).await?;
//! grant(&store, "ana@x.com", Role::Admin, &["accounts:read".to_string()]).await?;
//! ```

pub mod admin;
