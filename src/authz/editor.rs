use std::collections::BTreeSet;

use serde::Serialize;

use super::policy::{allowed_target_roles, is_authorized_for_role_change};
use super::principal::Principal;
use super::role::Role;
use crate::errors::{AppError, AppResult};
use crate::models::user::Identity;

/// What the role editor may offer for one target user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoleEditPlan {
    /// The edit action is disabled and hidden, not merely rejected on submit.
    Locked,
    Editable {
        current: Role,
        options: BTreeSet<Role>,
    },
}

impl RoleEditPlan {
    /// Decide from the acting and target users' primary roles.
    pub fn for_target(actor: &Identity, target: &Identity) -> AppResult<Self> {
        let actor = Principal::from_identity(actor)?;
        let target = Principal::from_identity(target)?;

        let plan = match (actor.primary_role(), target.primary_role()) {
            (Some(acting), Some(current)) if is_authorized_for_role_change(acting, current) => {
                RoleEditPlan::Editable {
                    current,
                    options: allowed_target_roles(acting),
                }
            }
            _ => RoleEditPlan::Locked,
        };
        Ok(plan)
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, RoleEditPlan::Editable { .. })
    }

    /// Check a submitted role against the plan.
    pub fn validate(&self, new_role: Role) -> AppResult<()> {
        match self {
            RoleEditPlan::Locked => Err(AppError::forbidden("role of this user cannot be changed")),
            RoleEditPlan::Editable { options, .. } if !options.contains(&new_role) => {
                Err(AppError::forbidden(format!("cannot assign role {new_role}")))
            }
            RoleEditPlan::Editable { current, .. } if *current == new_role => {
                Err(AppError::validation(format!("user already has role {new_role}")))
            }
            RoleEditPlan::Editable { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_role(name: &str, role: &str) -> Identity {
        Identity::new(name, name).with_roles([role.to_string()])
    }

    #[test]
    fn owner_editing_manager() {
        let plan = RoleEditPlan::for_target(&with_role("o", "OWNER"), &with_role("m", "MANAGER")).unwrap();
        assert_eq!(
            plan,
            RoleEditPlan::Editable {
                current: Role::Manager,
                options: BTreeSet::from([Role::Admin, Role::Manager, Role::User]),
            }
        );
        assert!(plan.validate(Role::Admin).is_ok());
        assert_eq!(plan.validate(Role::Owner).unwrap_err().kind(), "not_authorized");
        assert_eq!(plan.validate(Role::Manager).unwrap_err().kind(), "validation_failed");
    }

    #[test]
    fn peers_and_superiors_are_locked() {
        let admin = with_role("a", "ADMIN");
        assert_eq!(
            RoleEditPlan::for_target(&admin, &with_role("b", "ADMIN")).unwrap(),
            RoleEditPlan::Locked
        );
        assert_eq!(
            RoleEditPlan::for_target(&admin, &with_role("o", "OWNER")).unwrap(),
            RoleEditPlan::Locked
        );
        assert_eq!(RoleEditPlan::for_target(&admin, &admin).unwrap(), RoleEditPlan::Locked);
        assert!(RoleEditPlan::Locked.validate(Role::User).is_err());
    }

    #[test]
    fn user_can_never_edit() {
        let user = with_role("u", "USER");
        for target in ["OWNER", "ADMIN", "MANAGER", "USER"] {
            let plan = RoleEditPlan::for_target(&user, &with_role("t", target)).unwrap();
            assert!(!plan.is_editable());
        }
    }

    #[test]
    fn roleless_target_is_locked() {
        let plan = RoleEditPlan::for_target(&with_role("o", "OWNER"), &Identity::new("x", "x")).unwrap();
        assert_eq!(plan, RoleEditPlan::Locked);
    }
}
