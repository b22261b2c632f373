//! Authorization module - role ranks, policy and guards
//!
//! This module implements the dashboard's access rules:
//! - Closed role enumeration with a strict rank order
//! - Page access by role-set intersection
//! - Role editing limited to strictly lower ranks
//! - Route guard that fails closed while the session is still restoring

mod editor;
mod guard;
mod policy;
mod principal;
mod role;

pub use editor::RoleEditPlan;
pub use guard::{Access, RouteGuard};
pub use policy::{
    allowed_target_roles, can_access_page, is_authorized_for_role_change, rank_of, rank_of_tag,
};
pub use principal::Principal;
pub use role::Role;
