#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pennywise::pennywise_auth::{ManualClock, TokenService};
use pennywise::pennywise_config::{CorsConfig, JwtConfig};
use pennywise::pennywise_core::{CredentialHasher, Role};
use pennywise::pennywise_db::{AccountStore, InMemoryAccountStore};
use pennywise::pennywise_models::{Account, NewAccount};
use pennywise::router::init_router;
use pennywise::state::AppState;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";
pub const TEST_TTL: i64 = 3600;
pub const TEST_PASSWORD: &str = "secret1";

/// Cheapest bcrypt cost; hashes still verify like production ones.
pub fn test_hasher() -> CredentialHasher {
    CredentialHasher::with_cost(4)
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, TEST_TTL)
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryAccountStore>,
    pub tokens: Arc<TokenService>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let store = Arc::new(InMemoryAccountStore::new(test_hasher()));
        let tokens = Arc::new(TokenService::with_clock(&test_jwt_config(), clock.clone()));
        let state = AppState::new(
            store.clone(),
            tokens.clone(),
            CorsConfig::from_list("http://localhost:5173"),
        );

        Self {
            router: init_router(state),
            store,
            tokens,
            clock,
        }
    }

    /// Sends one request through the router and returns status and JSON body.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Creates an account directly in the store and returns it with a fresh token.
    pub async fn create_account(
        &self,
        email: &str,
        role: Role,
        permissions: &[&str],
    ) -> (Account, String) {
        let mut new = NewAccount::registration("Test User", email, TEST_PASSWORD).with_role(role);
        new.permissions = permissions
            .iter()
            .map(|p| p.to_string())
            .collect::<BTreeSet<_>>();

        let account = self.store.create(new).await.unwrap();
        let token = self.tokens.issue(account.id).unwrap();
        (account, token)
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}
