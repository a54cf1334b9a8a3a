//! JWT (JSON Web Token) session tokens.
//!
//! [`TokenService`] signs tokens with the server secret and performs the only
//! validation that counts: signature first, then expiry against its [`Clock`].
//! [`decode_claims_unverified`] reads claims without any secret. Clients use it
//! to schedule their own logout; it must never gate access to anything.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use pennywise_config::JwtConfig;

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::error::TokenError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and validates signed session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: i64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(jwt_config: &JwtConfig) -> Self {
        Self::with_clock(jwt_config, Arc::new(SystemClock))
    }

    pub fn with_clock(jwt_config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_config.secret.as_bytes()),
            ttl: jwt_config.token_ttl,
            clock,
        }
    }

    /// Configured token lifetime in seconds.
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Issues a token for `account_id` with the configured lifetime.
    pub fn issue(&self, account_id: Uuid) -> Result<String, TokenError> {
        self.issue_with_ttl(account_id, self.ttl)
    }

    /// Issues a token valid for `ttl` seconds from now.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidTtl`] if `ttl` is not positive, since `exp` must
    /// be strictly after `iat`.
    pub fn issue_with_ttl(&self, account_id: Uuid, ttl: i64) -> Result<String, TokenError> {
        if ttl <= 0 {
            return Err(TokenError::InvalidTtl(ttl));
        }

        let now = self.clock.now().timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Verifies the signature, then the expiry, and returns the claims.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Invalid`] for any signature or structural failure
    /// - [`TokenError::Expired`] for a correctly signed token whose `exp` has passed
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Token failed signature validation");
                TokenError::Invalid
            })?;

        if !claims.is_live_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Reads a token's claims without checking its signature or expiry.
///
/// Callers must treat the result as advisory only.
pub fn decode_claims_unverified(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig::new("test-secret-key-at-least-32-characters-long", 3600)
    }

    fn service_with_clock() -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let service = TokenService::with_clock(&get_test_jwt_config(), clock.clone());
        (service, clock)
    }

    #[test]
    fn test_issue_and_validate() {
        let (service, clock) = service_with_clock();
        let account_id = Uuid::new_v4();

        let token = service.issue(account_id).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.iat, clock.now().timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expires_exactly_at_exp() {
        let (service, clock) = service_with_clock();
        let token = service.issue_with_ttl(Uuid::new_v4(), 60).unwrap();

        clock.advance(Duration::seconds(59));
        assert!(service.validate(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(service.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let (service, _) = service_with_clock();
        assert!(matches!(
            service.issue_with_ttl(Uuid::new_v4(), 0),
            Err(TokenError::InvalidTtl(0))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid_not_expired() {
        let (service, clock) = service_with_clock();
        let token = service.issue_with_ttl(Uuid::new_v4(), 60).unwrap();

        let other = TokenService::with_clock(
            &JwtConfig::new("different-secret-key-at-least-32-characters", 60),
            clock.clone(),
        );
        clock.advance(Duration::seconds(600));
        assert!(matches!(other.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let (service, _) = service_with_clock();
        assert!(matches!(
            service.validate("invalid-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_decode_unverified_ignores_signature_and_expiry() {
        let (service, clock) = service_with_clock();
        let account_id = Uuid::new_v4();
        let token = service.issue_with_ttl(account_id, 60).unwrap();
        clock.advance(Duration::days(1));

        let claims = decode_claims_unverified(&token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), account_id);
        assert!(!claims.is_live_at(clock.now()));
    }

    #[test]
    fn test_decode_unverified_malformed() {
        assert!(matches!(
            decode_claims_unverified("not-a-jwt"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(
            decode_claims_unverified("a.b.c"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_debug_does_not_print_keys() {
        let (service, _) = service_with_clock();
        let printed = format!("{service:?}");
        assert!(printed.contains("ttl"));
        assert!(!printed.contains("test-secret-key"));
    }
}
