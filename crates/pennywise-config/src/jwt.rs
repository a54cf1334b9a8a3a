use std::env;

use tracing::warn;

use crate::env_parse;

const DEV_SECRET: &str = "pennywise-dev-secret-change-in-production";

/// Default session lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL: i64 = 604_800;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Session token lifetime in seconds; always at least 1.
    pub token_ttl: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_ttl: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: token_ttl.max(1),
        }
    }

    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, using the development secret");
            DEV_SECRET.to_string()
        });

        Self::new(
            secret,
            env_parse("JWT_EXPIRY").unwrap_or(DEFAULT_TOKEN_TTL), // 7 days
        )
    }
}
