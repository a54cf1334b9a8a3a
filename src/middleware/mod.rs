//! Middleware modules for request processing.
//!
//! - [`auth`]: Bearer token authentication and permission extractors
//! - [`role`]: Minimum-role route layers
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the token and yields the account id
//! 3. Role layers and permission extractors load the account and check it
//! 4. Handler executes if all checks pass
//!
//! Authentication always runs before authorization, so a request without a
//! valid token gets 401 even on routes that would also deny it with 403.

pub mod auth;
pub mod role;
