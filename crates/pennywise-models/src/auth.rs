//! Authentication request and response bodies.

use std::collections::BTreeSet;

use pennywise_core::Role;
use pennywise_core::serde::{
    deserialize_normalized_email, deserialize_optional_normalized_email,
    deserialize_optional_trimmed, deserialize_trimmed,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::accounts::AccountPublicView;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;
// `validator` length bounds are `u64`; mirrors `MIN_PASSWORD_LENGTH`.
const MIN_PASSWORD_LENGTH_U64: u64 = MIN_PASSWORD_LENGTH as u64;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ana")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_normalized_email")]
    #[validate(email(message = "Invalid email"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH_U64, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(deserialize_with = "deserialize_normalized_email")]
    #[validate(email(message = "Invalid email"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Subset of `{name, email}`. Password changes use [`ChangePasswordRequest`].
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_normalized_email")]
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH_U64, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Role and permission assignment performed by an administrator.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAccessRequest {
    pub role: Role,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub permissions: BTreeSet<String>,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub data: AccountPublicView,
    pub token: String,
}

impl AuthResponse {
    pub fn new(data: AccountPublicView, token: String) -> Self {
        Self {
            success: true,
            data,
            token,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub success: bool,
    pub data: AccountPublicView,
}

impl AccountResponse {
    pub fn new(data: AccountPublicView) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
