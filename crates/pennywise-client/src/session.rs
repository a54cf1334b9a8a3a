//! The client-side session and its expiry timer.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use pennywise_auth::{Clock, SystemClock, decode_claims_unverified};
use pennywise_core::{AuthorizationGuard, Role};
use pennywise_models::AccountPublicView;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::storage::{SessionStorage, TOKEN_SLOT, USER_SLOT};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    Authenticated,
    /// The token's expiry passed while logged in. Left through `login` or `logout`.
    Expired,
}

/// Transitions the host is told about, e.g. to redirect on `Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    Expired,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    token: Option<String>,
    account: Option<AccountPublicView>,
    expires_at: Option<DateTime<Utc>>,
    /// Bumped whenever the pending timer is replaced or cancelled.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn reset(&mut self, state: SessionState) {
        self.cancel_timer();
        self.token = None;
        self.account = None;
        self.expires_at = None;
        self.state = state;
    }
}

struct Shared {
    storage: Box<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<SessionEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_storage(&self) -> Result<(), SessionError> {
        self.storage.remove(TOKEN_SLOT)?;
        self.storage.remove(USER_SLOT)
    }

    fn notify(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Expiry of `token` if it can be read and has not passed yet.
    fn live_expiry(&self, token: &str) -> Option<DateTime<Utc>> {
        let claims = decode_claims_unverified(token).ok()?;
        if claims.is_live_at(self.clock.now()) {
            claims.expires_at()
        } else {
            None
        }
    }

    fn logout_locked(&self, inner: &mut Inner) -> Result<(), SessionError> {
        let was = inner.state;
        inner.reset(SessionState::LoggedOut);
        self.clear_storage()?;

        if was != SessionState::LoggedOut {
            info!("Session logged out");
            self.notify(SessionEvent::LoggedOut);
        }
        Ok(())
    }

    /// Timer callback. Does nothing unless `generation` is still current.
    fn expire(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation != generation || inner.state != SessionState::Authenticated {
            debug!(generation, "Ignoring stale expiry timer");
            return;
        }

        // the handle belongs to the task running this; drop it without aborting
        inner.timer = None;
        inner.reset(SessionState::Expired);
        if let Err(err) = self.clear_storage() {
            warn!(error = %err, "Failed to clear session storage on expiry");
        }

        info!("Session token expired");
        self.notify(SessionEvent::Expired);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
    }
}

/// Holder of one client's token, account snapshot and expiry timer.
///
/// Cloning yields another handle to the same session. At most one expiry
/// timer is pending at any time; `login` replaces it rather than adding one.
#[derive(Clone)]
pub struct ClientSession {
    shared: Arc<Shared>,
}

impl fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("ClientSession")
            .field("state", &inner.state)
            .field("expires_at", &inner.expires_at)
            .finish_non_exhaustive()
    }
}

impl ClientSession {
    pub fn new(storage: impl SessionStorage) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: impl SessionStorage, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                storage: Box::new(storage),
                clock,
                inner: Mutex::new(Inner::default()),
                events,
            }),
        }
    }

    /// Starts a session from a freshly issued token.
    ///
    /// Any pending timer is cancelled first. A token whose expiry cannot be
    /// read or has already passed logs the session out instead, as does a
    /// failure to persist the token or snapshot.
    pub fn login(
        &self,
        token: &str,
        account: AccountPublicView,
    ) -> Result<SessionState, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let snapshot = serde_json::to_string(&account)?;

        let mut inner = self.shared.lock();
        inner.cancel_timer();

        let Some(expires_at) = self.shared.live_expiry(token) else {
            warn!("Login token is unreadable or already expired, logging out");
            self.shared.logout_locked(&mut inner)?;
            return Ok(SessionState::LoggedOut);
        };

        let persisted = self
            .shared
            .storage
            .set(TOKEN_SLOT, token)
            .and_then(|()| self.shared.storage.set(USER_SLOT, &snapshot));
        if let Err(err) = persisted {
            warn!(error = %err, "Failed to persist session, logging out");
            if let Err(clear_err) = self.shared.logout_locked(&mut inner) {
                warn!(error = %clear_err, "Failed to clear session storage after persist error");
            }
            return Err(err);
        }

        inner.state = SessionState::Authenticated;
        inner.token = Some(token.to_string());
        inner.account = Some(account);
        inner.expires_at = Some(expires_at);
        self.schedule(&runtime, &mut inner, expires_at);

        info!(%expires_at, "Session started");
        self.shared.notify(SessionEvent::LoggedIn);
        Ok(SessionState::Authenticated)
    }

    /// Cancels the timer and clears both storage slots. Idempotent.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut inner = self.shared.lock();
        self.shared.logout_locked(&mut inner)
    }

    /// Restores a persisted session on start-up without contacting the server.
    pub fn rehydrate(&self) -> Result<SessionState, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let token = self.shared.storage.get(TOKEN_SLOT)?;
        let account = self
            .shared
            .storage
            .get(USER_SLOT)?
            .and_then(|raw| serde_json::from_str::<AccountPublicView>(&raw).ok());

        let mut inner = self.shared.lock();
        inner.cancel_timer();

        if let (Some(token), Some(account)) = (token, account) {
            if let Some(expires_at) = self.shared.live_expiry(&token) {
                inner.state = SessionState::Authenticated;
                inner.token = Some(token);
                inner.account = Some(account);
                inner.expires_at = Some(expires_at);
                self.schedule(&runtime, &mut inner, expires_at);

                debug!(%expires_at, "Session rehydrated");
                self.shared.notify(SessionEvent::LoggedIn);
                return Ok(SessionState::Authenticated);
            }
        }

        self.shared.logout_locked(&mut inner)?;
        Ok(SessionState::LoggedOut)
    }

    fn schedule(&self, runtime: &Handle, inner: &mut Inner, expires_at: DateTime<Utc>) {
        let delay = (expires_at - self.shared.clock.now())
            .to_std()
            .unwrap_or_default();
        let generation = inner.generation;
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);

        inner.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.expire(generation);
            }
        }));
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn token(&self) -> Option<String> {
        self.shared.lock().token.clone()
    }

    pub fn account(&self) -> Option<AccountPublicView> {
        self.shared.lock().account.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub fn token_expiration(&self) -> Option<DateTime<Utc>> {
        self.shared.lock().expires_at
    }

    /// Whether the held token's expiry is still ahead. Signature is not checked.
    pub fn is_token_valid(&self) -> bool {
        let now = self.shared.clock.now();
        let inner = self.shared.lock();
        inner.state == SessionState::Authenticated
            && inner.expires_at.is_some_and(|exp| exp > now)
    }

    /// Returns the account snapshot, or logs out and fails if the token is no longer valid.
    pub fn require_auth(&self) -> Result<AccountPublicView, SessionError> {
        if self.is_token_valid() {
            if let Some(account) = self.account() {
                return Ok(account);
            }
        }
        self.logout()?;
        Err(SessionError::NotAuthenticated)
    }

    /// `Bearer <token>` for the `Authorization` header.
    pub fn authorization_header(&self) -> Option<String> {
        self.shared
            .lock()
            .token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }

    /// UI gating only.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.shared
            .lock()
            .account
            .as_ref()
            .is_some_and(|account| AuthorizationGuard::require_role(account, minimum))
    }

    /// UI gating only.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.shared
            .lock()
            .account
            .as_ref()
            .is_some_and(|account| AuthorizationGuard::require_permission(account, permission))
    }

    pub fn has_pending_timer(&self) -> bool {
        self.shared
            .lock()
            .timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}
