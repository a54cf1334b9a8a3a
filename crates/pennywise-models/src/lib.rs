//! # Pennywise Models
//!
//! Domain models and DTOs for the Pennywise API.
//!
//! # Modules
//!
//! - [`accounts`]: The stored account record and its public view
//! - [`auth`]: Request and response bodies of the authentication endpoints
//!
//! The stored [`Account`] deliberately has no `Serialize` impl. The only way
//! to put an account on the wire is [`AccountPublicView`], which has no field
//! for the credential hash or the internal version counter.

pub mod accounts;
pub mod auth;

// Re-export commonly used types at crate root for convenience
pub use accounts::{Account, AccountPublicView, NewAccount, ProfileUpdate};
pub use auth::{
    AccountResponse, AuthResponse, ChangePasswordRequest, LoginRequest, MIN_PASSWORD_LENGTH,
    MessageResponse, RegisterRequest, UpdateAccessRequest, UpdateProfileRequest,
};
