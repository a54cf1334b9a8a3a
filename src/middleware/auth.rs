use std::fmt;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use pennywise_auth::{TokenError, TokenService};
use pennywise_core::AppError;
use pennywise_models::Account;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

pub const NOT_AUTHORIZED: &str = "Not authorized";

/// Every authentication failure, whatever the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Not authorized")]
pub struct Unauthenticated;

impl From<Unauthenticated> for AppError {
    fn from(_: Unauthenticated) -> Self {
        AppError::unauthorized(NOT_AUTHORIZED)
    }
}

/// Why a request was rejected. Logged, never returned.
#[derive(Debug)]
enum Rejection {
    MissingHeader,
    MalformedHeader,
    Token(TokenError),
    InvalidSubject,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingHeader => f.write_str("missing authorization header"),
            Rejection::MalformedHeader => f.write_str("authorization header is not `Bearer <token>`"),
            Rejection::Token(err) => write!(f, "token rejected: {err}"),
            Rejection::InvalidSubject => f.write_str("token subject is not an account id"),
        }
    }
}

/// Extracts the token from `Bearer <token>`. The scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Turns a raw `Authorization` header into the authenticated account id.
#[derive(Clone)]
pub struct RequestAuthenticator {
    tokens: Arc<TokenService>,
}

impl fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAuthenticator").finish_non_exhaustive()
    }
}

impl RequestAuthenticator {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Uuid, Unauthenticated> {
        self.resolve(authorization).map_err(|reason| {
            match &reason {
                Rejection::MissingHeader | Rejection::Token(TokenError::Expired) => {
                    debug!(%reason, "Request not authenticated")
                }
                _ => warn!(%reason, "Request not authenticated"),
            }
            Unauthenticated
        })
    }

    fn resolve(&self, authorization: Option<&str>) -> Result<Uuid, Rejection> {
        let header = authorization.ok_or(Rejection::MissingHeader)?;
        let token = bearer_token(header).ok_or(Rejection::MalformedHeader)?;
        let claims = self.tokens.validate(token).map_err(Rejection::Token)?;
        claims.subject_id().map_err(|_| Rejection::InvalidSubject)
    }
}

/// The id of the account whose token authenticated this request.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub account_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(*auth_user);
        }

        // a header that is not valid UTF-8 cannot carry a bearer token
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let account_id = state.authenticator.authenticate(header)?;
        let auth_user = AuthUser { account_id };
        parts.extensions.insert(auth_user);

        Ok(auth_user)
    }
}

/// The authenticated account, loaded from the store.
///
/// An account that no longer exists is treated like a bad token.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(account) = parts.extensions.get::<Account>() {
            return Ok(CurrentAccount(account.clone()));
        }

        let AuthUser { account_id } = AuthUser::from_request_parts(parts, state).await?;
        let account = state
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| {
                warn!(%account_id, "Token subject has no account");
                Unauthenticated
            })?;

        parts.extensions.insert(account.clone());
        Ok(CurrentAccount(account))
    }
}

/// Declares an extractor that loads the current account and requires one permission.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub pennywise_models::Account);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = pennywise_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let $crate::middleware::auth::CurrentAccount(account) =
                    <$crate::middleware::auth::CurrentAccount as axum::extract::FromRequestParts<
                        $crate::state::AppState,
                    >>::from_request_parts(parts, state)
                    .await?;

                if !pennywise_core::AuthorizationGuard::require_permission(&account, $permission) {
                    return Err(pennywise_core::AppError::forbidden(format!(
                        "Access denied. Missing required permission: {}",
                        $permission
                    )));
                }

                Ok($name(account))
            }
        }
    };
}

require_permission!(RequireAccountsRead, pennywise_core::permissions::ACCOUNTS_READ);
require_permission!(RequireAccountsManage, pennywise_core::permissions::ACCOUNTS_MANAGE);
