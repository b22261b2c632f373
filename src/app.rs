use std::sync::Arc;

use crate::authz::RouteGuard;
use crate::client::HttpClient;
use crate::config::ConsoleConfig;
use crate::errors::AppResult;
use crate::session::{FileTokenStore, SessionManager, TokenStore};

/// Application-level provider handed to every page and command.
///
/// Cloning is cheap; all clones share the same session.
#[derive(Clone)]
pub struct Console {
    pub session: Arc<SessionManager>,
    pub http: Arc<HttpClient>,
    pub guard: RouteGuard,
}

impl Console {
    pub fn new(session: Arc<SessionManager>, http: Arc<HttpClient>) -> Self {
        Self {
            session,
            http,
            guard: RouteGuard::new(),
        }
    }
}

pub fn create_console(config: &ConsoleConfig) -> AppResult<Console> {
    let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
    create_console_with_store(config, store)
}

pub fn create_console_with_store(config: &ConsoleConfig, store: Arc<dyn TokenStore>) -> AppResult<Console> {
    let http = Arc::new(HttpClient::new(config)?);
    let session = Arc::new(SessionManager::new(http.clone(), store));
    tracing::debug!(base_url = %http.base_url(), "console created");
    Ok(Console::new(session, http))
}
