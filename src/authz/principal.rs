use super::role::Role;
use crate::errors::AppResult;
use crate::models::user::Identity;

/// Principal is the validated authorization view of an identity.
///
/// The backend ships roles as a list of tags. Only the first one (the primary
/// role) is consulted for role edits; multi-role identities are kept intact but
/// are not otherwise interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_name: String,
    roles: Vec<Role>,
}

impl Principal {
    /// Parse every role tag. An unknown tag is a contract violation with the
    /// backend, so it is logged loudly and propagated.
    pub fn from_identity(identity: &Identity) -> AppResult<Self> {
        let roles = identity
            .roles
            .iter()
            .map(|tag| {
                tag.parse::<Role>().map_err(|err| {
                    tracing::error!(
                        user_name = %identity.user_name,
                        tag = %tag,
                        "identity carries an unknown role"
                    );
                    err
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            user_name: identity.user_name.clone(),
            roles,
        })
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
