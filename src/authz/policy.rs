use std::collections::BTreeSet;

use super::role::Role;
use crate::errors::AppResult;

/// Page access check.
///
/// An empty requirement means the page is public. Otherwise the identity needs
/// at least one role in common with the requirement; an identity without roles
/// never passes a restricted page.
pub fn can_access_page(identity_roles: &[Role], required_roles: &[Role]) -> bool {
    if required_roles.is_empty() {
        return true;
    }

    let granted = identity_roles.iter().any(|role| required_roles.contains(role));
    tracing::debug!(
        roles = ?identity_roles,
        required = ?required_roles,
        granted,
        "page access evaluated"
    );
    granted
}

pub fn rank_of(role: Role) -> u8 {
    role.rank()
}

/// Rank of a raw role tag as it arrives from the backend.
pub fn rank_of_tag(tag: &str) -> AppResult<u8> {
    let role: Role = tag.parse().map_err(|err| {
        tracing::error!(tag = %tag, "role tag outside the known enumeration");
        err
    })?;
    Ok(rank_of(role))
}

/// Roles `acting_role` may hand out to other users: every rank strictly below
/// its own, down to and including `User`.
pub fn allowed_target_roles(acting_role: Role) -> BTreeSet<Role> {
    Role::ALL
        .into_iter()
        .filter(|candidate| rank_of(*candidate) < rank_of(acting_role))
        .collect()
}

/// Whether `acting_role` may open the role editor for a user currently holding
/// `target_current_role`. Strictly greater rank only, so peers and self are denied.
pub fn is_authorized_for_role_change(acting_role: Role, target_current_role: Role) -> bool {
    let authorized = rank_of(acting_role) > rank_of(target_current_role);
    tracing::debug!(
        acting = %acting_role,
        target = %target_current_role,
        authorized,
        "role change authorization evaluated"
    );
    authorized
}
