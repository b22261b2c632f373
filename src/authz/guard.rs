use serde::Serialize;

use super::policy::can_access_page;
use super::principal::Principal;
use crate::pages::Page;
use crate::session::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Granted,
    /// The session is still being restored; show a spinner, not the page.
    Pending,
    /// Send the visitor to the login page.
    LoginRequired,
    /// Send the visitor to the unauthorized page.
    Forbidden,
}

/// Route guard consulted before rendering a page.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, snapshot: &SessionSnapshot, page: Page) -> Access {
        if !page.requires_auth() {
            return Access::Granted;
        }

        if !snapshot.state.is_settled() {
            return Access::Pending;
        }

        let identity = match snapshot.identity.as_ref() {
            Some(identity) if snapshot.is_authenticated() => identity,
            _ => return Access::LoginRequired,
        };

        let principal = match Principal::from_identity(identity) {
            Ok(principal) => principal,
            Err(err) => {
                tracing::error!(page = ?page, error = %err, "denying page to identity with invalid roles");
                return Access::Forbidden;
            }
        };

        if can_access_page(principal.roles(), page.required_roles()) {
            Access::Granted
        } else {
            tracing::debug!(user_name = %principal.user_name, page = ?page, "page forbidden");
            Access::Forbidden
        }
    }

    /// Sidebar entries this session may open.
    pub fn accessible_pages(&self, snapshot: &SessionSnapshot) -> Vec<Page> {
        Page::ALL
            .into_iter()
            .filter(|page| page.in_menu())
            .filter(|page| self.check(snapshot, *page) == Access::Granted)
            .collect()
    }
}
