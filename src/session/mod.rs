//! Session module - the process-wide authentication state
//!
//! One [`SessionManager`] owns the session. Everything else reads snapshots or
//! subscribes to [`SessionEvent`]s; nothing outside the manager mutates it.

mod backend;
mod manager;
mod store;

pub use backend::AuthBackend;
pub use manager::SessionManager;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use serde::Serialize;

use crate::models::user::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Process started, restore not attempted yet.
    Uninitialized,
    /// A persisted token is being resolved.
    Restoring,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    /// Uninitialized and Restoring are not settled; guards must treat them as "no access yet".
    pub fn is_settled(&self) -> bool {
        matches!(self, SessionState::Authenticated | SessionState::Unauthenticated)
    }
}

/// Read-only copy of the session handed to pages and guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub identity: Option<Identity>,
}

impl SessionSnapshot {
    pub fn unauthenticated() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            identity: None,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            state: SessionState::Authenticated,
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated && self.identity.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    LoggedIn { user_name: String },
    Restored { user_name: String },
    LoggedOut,
    /// The backend rejected the token; the session was torn down.
    Invalidated,
}
