use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// Authenticated user as described by the backend's `userInfo` payload.
///
/// Profile attributes are read-only from the console's point of view. `roles`
/// keeps the backend's list shape; see [`crate::authz::Principal`] for the
/// validated view used in authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(deserialize_with = "crate::utils::opaque_id")]
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: user_name.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: None,
            roles: Vec::new(),
            created_at: None,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = String>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Raw primary role tag, unvalidated.
    pub fn primary_role_tag(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }

    fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.first_name, term)
            || contains_ignore_case(&self.last_name, term)
            || contains_ignore_case(&self.user_name, term)
            || contains_ignore_case(&self.email, term)
            || self.roles.iter().any(|role| contains_ignore_case(role, term))
    }
}

/// Case-insensitive search over names, user name, email and role tags.
pub fn search_users<'a>(users: &'a [Identity], term: &str) -> Vec<&'a Identity> {
    users.iter().filter(|user| user.matches(term)).collect()
}

/// Head count per primary role tag. Users without a role are not counted.
pub fn role_stats(users: &[Identity]) -> BTreeMap<String, usize> {
    users
        .iter()
        .filter_map(|user| user.primary_role_tag())
        .fold(BTreeMap::new(), |mut acc, role| {
            *acc.entry(role.to_string()).or_insert(0) += 1;
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, first: &str, role: &str) -> Identity {
        let mut u = Identity::new(name, name).with_roles([role.to_string()]);
        u.first_name = first.to_string();
        u.email = format!("{name}@example.com");
        u
    }

    #[test]
    fn deserializes_backend_payload() {
        let json = serde_json::json!({
            "id": 12,
            "firstName": "Alice",
            "lastName": "Doe",
            "userName": "alice",
            "email": "alice@example.com",
            "createdAt": "2024-03-01T10:00:00.5",
            "roles": ["ADMIN"]
        });
        let identity: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(identity.id, "12");
        assert_eq!(identity.user_name, "alice");
        assert_eq!(identity.full_name(), "Alice Doe");
        assert_eq!(identity.primary_role_tag(), Some("ADMIN"));
        assert!(identity.address.is_none());
        assert!(identity.created_at.is_some());
    }

    #[test]
    fn search_covers_profile_and_roles() {
        let users = vec![user("alice", "Alice", "ADMIN"), user("bob", "Bob", "USER")];
        assert_eq!(search_users(&users, "ALI").len(), 1);
        assert_eq!(search_users(&users, "admin")[0].user_name, "alice");
        assert_eq!(search_users(&users, "example.com").len(), 2);
        assert_eq!(search_users(&users, "").len(), 2);
    }

    #[test]
    fn stats_by_primary_role() {
        let users = vec![
            user("a", "A", "USER"),
            user("b", "B", "USER"),
            user("c", "C", "OWNER"),
            Identity::new("d", "d"),
        ];
        let stats = role_stats(&users);
        assert_eq!(stats.get("USER"), Some(&2));
        assert_eq!(stats.get("OWNER"), Some(&1));
        assert_eq!(stats.len(), 2);
    }
}
