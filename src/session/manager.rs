use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::{AuthBackend, SessionEvent, SessionSnapshot, SessionState, TokenStore};
use crate::errors::{AppError, AppResult};
use crate::jwt::{self, TokenShape};
use crate::models::auth::{LoginRequest, RegisterRequest};
use crate::models::user::Identity;
use crate::utils::token_fingerprint;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct Session {
    state: SessionState,
    identity: Option<Identity>,
    token: Option<String>,
}

impl Session {
    fn clear(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.identity = None;
        self.token = None;
    }
}

/// Owner of the single process-wide session.
///
/// Every applied transition (`restore` starting, a login taking effect,
/// `logout`, `invalidate`) bumps a monotonically increasing epoch. Operations
/// that suspend on the network remember the epoch they started under and only
/// apply their result if no other transition happened in between. A login that
/// fails changes nothing, so it does not move the epoch; among overlapping
/// logins only the most recently started one may apply.
pub struct SessionManager {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn TokenStore>,
    session: RwLock<Session>,
    epoch: AtomicU64,
    login_attempts: AtomicU64,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn AuthBackend>, store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            store,
            session: RwLock::new(Session {
                state: SessionState::Uninitialized,
                identity: None,
                token: None,
            }),
            epoch: AtomicU64::new(0),
            login_attempts: AtomicU64::new(0),
            events,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.read().state
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.read().identity.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.read();
        SessionSnapshot {
            state: session.state,
            identity: session.identity.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current bearer token, or `TokenExpiredOrInvalid` when there is no
    /// authenticated session to speak for.
    pub fn bearer(&self) -> AppResult<String> {
        let session = self.session.read();
        match (&session.state, &session.token) {
            (SessionState::Authenticated, Some(token)) => Ok(token.clone()),
            _ => Err(AppError::TokenExpiredOrInvalid),
        }
    }

    /// Resolve the persisted token, if any, into an authenticated session.
    ///
    /// Never fails: every problem ends in `Unauthenticated` with the persisted
    /// token removed.
    pub async fn restore(&self) -> SessionState {
        let ticket = {
            let mut session = self.session.write();
            session.state = SessionState::Restoring;
            session.identity = None;
            session.token = None;
            self.bump()
        };

        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("no persisted token; starting unauthenticated");
                return self.settle_unauthenticated(ticket, false);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted token");
                return self.settle_unauthenticated(ticket, true);
            }
        };

        match jwt::inspect(&token) {
            TokenShape::Malformed => {
                tracing::warn!("persisted token is malformed; discarding");
                return self.settle_unauthenticated(ticket, true);
            }
            TokenShape::Expired { at } => {
                tracing::info!(expired_at = %at, "persisted token expired; discarding");
                return self.settle_unauthenticated(ticket, true);
            }
            TokenShape::Live { .. } | TokenShape::Opaque => {}
        }

        match self.backend.whoami(&token).await {
            Ok(identity) => {
                let mut session = self.session.write();
                if !self.is_current(ticket) {
                    tracing::debug!("restore superseded by a newer session operation");
                    return session.state;
                }

                tracing::info!(
                    user_name = %identity.user_name,
                    token = %token_fingerprint(&token),
                    "session restored"
                );
                let user_name = identity.user_name.clone();
                session.state = SessionState::Authenticated;
                session.identity = Some(identity);
                session.token = Some(token);
                drop(session);

                self.publish(SessionEvent::Restored { user_name });
                SessionState::Authenticated
            }
            Err(err) => {
                tracing::warn!(error = %err, "persisted token rejected");
                self.settle_unauthenticated(ticket, true)
            }
        }
    }

    /// Submit credentials. On success the token is persisted before the session
    /// becomes Authenticated. Failures are returned as-is and never retried.
    pub async fn login(&self, user_name: &str, password: &str) -> AppResult<Identity> {
        let request = LoginRequest::new(user_name, password);
        request.validate()?;

        let ticket = self.epoch.load(Ordering::SeqCst);
        let attempt = self.login_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let response = self.backend.login(&request).await.map_err(|err| {
            tracing::warn!(user_name = %user_name, error = %err, "login failed");
            err
        })?;

        if response.new_token.trim().is_empty() {
            return Err(AppError::server("login response carried an empty token"));
        }

        let mut session = self.session.write();
        if !self.is_current(ticket) || self.login_attempts.load(Ordering::SeqCst) != attempt {
            tracing::warn!(user_name = %user_name, "discarding login result superseded by a newer session operation");
            return Err(AppError::Superseded);
        }

        self.store.save(&response.new_token)?;
        self.bump();

        let identity = response.user_info;
        tracing::info!(
            user_name = %identity.user_name,
            token = %token_fingerprint(&response.new_token),
            "logged in"
        );
        session.state = SessionState::Authenticated;
        session.identity = Some(identity.clone());
        session.token = Some(response.new_token);
        drop(session);

        self.publish(SessionEvent::LoggedIn {
            user_name: identity.user_name.clone(),
        });
        Ok(identity)
    }

    /// Create an account. Does not log the caller in.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        request.validate()?;
        self.backend.register(request).await?;
        tracing::info!(user_name = %request.user_name, "account registered");
        Ok(())
    }

    /// Tear the session down. Safe to call repeatedly.
    pub fn logout(&self) -> AppResult<()> {
        let mut session = self.session.write();
        self.bump();
        let was_authenticated = session.state == SessionState::Authenticated;
        session.clear();
        let cleared = self.store.clear();
        drop(session);

        if let Err(err) = &cleared {
            tracing::warn!(error = %err, "logged out but the persisted token could not be removed");
        }

        if was_authenticated {
            tracing::info!("logged out");
            self.publish(SessionEvent::LoggedOut);
        }
        cleared
    }

    /// Same teardown as [`logout`](Self::logout), triggered by the backend
    /// rejecting `token`. Returns whether this call performed the teardown;
    /// rejections of a token the session no longer holds, or repeats, are ignored.
    pub fn invalidate(&self, token: &str) -> bool {
        let mut session = self.session.write();
        if session.state != SessionState::Authenticated || session.token.as_deref() != Some(token) {
            return false;
        }

        self.bump();
        session.clear();
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to remove rejected token");
        }
        drop(session);

        tracing::warn!(
            token = %token_fingerprint(token),
            "backend rejected session token; re-authentication required"
        );
        self.publish(SessionEvent::Invalidated);
        true
    }

    fn settle_unauthenticated(&self, ticket: u64, clear_store: bool) -> SessionState {
        let mut session = self.session.write();
        if !self.is_current(ticket) {
            return session.state;
        }

        session.clear();
        if clear_store {
            if let Err(err) = self.store.clear() {
                tracing::warn!(error = %err, "failed to remove persisted token");
            }
        }
        SessionState::Unauthenticated
    }

    fn bump(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == ticket
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
