use serde::Serialize;

use crate::authz::Role;

const ROLE_EDITORS: &[Role] = &[Role::Owner, Role::Admin, Role::Manager];

/// Every screen of the dashboard together with what it takes to open it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Login,
    Register,
    Unauthorized,
    NotFound,
    Dashboard,
    UsersManagement,
    SendMessage,
    Inbox,
    AllMessages,
    SystemLogs,
    MyLogs,
    Owner,
    Admin,
    Manager,
    User,
    UpdateRole,
}

impl Page {
    pub const ALL: [Page; 17] = [
        Page::Home,
        Page::Login,
        Page::Register,
        Page::Unauthorized,
        Page::NotFound,
        Page::Dashboard,
        Page::UsersManagement,
        Page::SendMessage,
        Page::Inbox,
        Page::AllMessages,
        Page::SystemLogs,
        Page::MyLogs,
        Page::Owner,
        Page::Admin,
        Page::Manager,
        Page::User,
        Page::UpdateRole,
    ];

    /// Route pattern; `UpdateRole` takes the target user name as its last segment.
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Login => "/login",
            Page::Register => "/register",
            Page::Unauthorized => "/unauthorized",
            Page::NotFound => "/404",
            Page::Dashboard => "/dashboard",
            Page::UsersManagement => "/dashboard/users-management",
            Page::SendMessage => "/dashboard/send-message",
            Page::Inbox => "/dashboard/inbox",
            Page::AllMessages => "/dashboard/all-messages",
            Page::SystemLogs => "/dashboard/system-logs",
            Page::MyLogs => "/dashboard/my-logs",
            Page::Owner => "/dashboard/owner",
            Page::Admin => "/dashboard/admin",
            Page::Manager => "/dashboard/manager",
            Page::User => "/dashboard/user",
            Page::UpdateRole => "/dashboard/update-role/:userName",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Login",
            Page::Register => "Register",
            Page::Unauthorized => "Unauthorized",
            Page::NotFound => "Not Found",
            Page::Dashboard => "Dashboard",
            Page::UsersManagement => "Users Management",
            Page::SendMessage => "Send Message",
            Page::Inbox => "Inbox",
            Page::AllMessages => "All Messages",
            Page::SystemLogs => "System Logs",
            Page::MyLogs => "My Logs",
            Page::Owner => "Owner Page",
            Page::Admin => "Admin Page",
            Page::Manager => "Manager Page",
            Page::User => "User Page",
            Page::UpdateRole => "Update Role",
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Page::Home | Page::Login | Page::Register | Page::Unauthorized | Page::NotFound
        )
    }

    /// Roles that may open the page; empty means any authenticated user (or
    /// anyone, for public pages).
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Page::Owner => &[Role::Owner],
            Page::Admin => &[Role::Owner, Role::Admin],
            Page::Manager => ROLE_EDITORS,
            Page::User => &[Role::Owner, Role::Admin, Role::Manager, Role::User],
            Page::UpdateRole => ROLE_EDITORS,
            _ => &[],
        }
    }

    /// Entries shown in the sidebar.
    pub fn in_menu(&self) -> bool {
        self.requires_auth() && *self != Page::UpdateRole
    }

    pub fn from_path(path: &str) -> Page {
        let trimmed = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        if let Some(user) = trimmed.strip_prefix("/dashboard/update-role/") {
            if !user.is_empty() && !user.contains('/') {
                return Page::UpdateRole;
            }
            return Page::NotFound;
        }

        Page::ALL
            .into_iter()
            .find(|page| *page != Page::UpdateRole && page.path() == trimmed)
            .unwrap_or(Page::NotFound)
    }

    pub fn update_role_path(user_name: &str) -> String {
        format!("/dashboard/update-role/{user_name}")
    }
}
