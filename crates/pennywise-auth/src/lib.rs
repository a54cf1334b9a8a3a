//! # Pennywise Auth
//!
//! Session token issuing and validation for the Pennywise API.
//!
//! This crate provides:
//!
//! - [`claims`]: The claim set carried by every session token
//! - [`jwt`]: [`TokenService`], which signs and validates tokens, plus the
//!   secret-less [`decode_claims_unverified`] used by clients
//! - [`clock`]: The time source tokens are checked against
//! - [`error`]: Token-layer failures
//!
//! A token is valid exactly when its HS256 signature verifies under the server
//! secret and the current time is before its `exp` claim. Nothing is stored
//! server-side, so a token stays valid until it expires.
//!
//! # Example
//!
//! ```ignore
//! use pennywise_auth::TokenService;
//! use pennywise_config::JwtConfig;
//!
//! let tokens = TokenService::new(&JwtConfig::from_env());
//! let token = tokens.issue(account_id)?;
//! let claims = tokens.validate(&token)?;
//! assert_eq!(claims.sub, account_id.to_string());
//! ```

pub mod claims;
pub mod clock;
pub mod error;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TokenError;
pub use jwt::{TokenService, decode_claims_unverified};
