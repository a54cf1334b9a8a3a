//! Token-layer error types

use pennywise_core::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    /// Bad signature, wrong algorithm or unreadable token.
    #[error("Invalid token")]
    Invalid,

    /// Signature is fine but `exp` has passed.
    #[error("Token expired")]
    Expired,

    /// Claims could not be read even without signature checks.
    #[error("Malformed token")]
    Malformed,

    #[error("Token lifetime must be positive, got {0}s")]
    InvalidTtl(i64),

    #[error("Failed to create token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Whether the token itself was rejected, as opposed to an issuing failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenError::Invalid | TokenError::Expired | TokenError::Malformed
        )
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        if err.is_rejection() {
            AppError::unauthorized("Not authorized")
        } else {
            AppError::internal(err)
        }
    }
}
