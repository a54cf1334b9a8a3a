use std::sync::Arc;

use pennywise_auth::TokenService;
use pennywise_config::{CorsConfig, JwtConfig, ServerConfig};
use pennywise_core::CredentialHasher;
use pennywise_db::{AccountStore, InMemoryAccountStore, PgAccountStore, StoreError};
use tracing::{info, warn};

use crate::middleware::auth::RequestAuthenticator;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenService>,
    pub authenticator: RequestAuthenticator,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            accounts,
            authenticator: RequestAuthenticator::new(tokens.clone()),
            tokens,
            cors_config,
        }
    }
}

/// Builds the state from the environment.
///
/// Uses PostgreSQL when `DATABASE_URL` is set, the in-memory store otherwise.
pub async fn init_app_state(server_config: &ServerConfig) -> Result<AppState, StoreError> {
    let hasher = CredentialHasher::new();

    let accounts: Arc<dyn AccountStore> = match &server_config.database_url {
        Some(url) => {
            info!("Using PostgreSQL account store");
            Arc::new(PgAccountStore::connect(url, hasher).await?)
        }
        None => {
            warn!("DATABASE_URL not set, accounts are kept in memory and lost on restart");
            Arc::new(InMemoryAccountStore::new(hasher))
        }
    };

    Ok(AppState::new(
        accounts,
        Arc::new(TokenService::new(&JwtConfig::from_env())),
        CorsConfig::from_env(),
    ))
}
