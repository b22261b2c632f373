use super::check_path_segment;
use crate::app::Console;
use crate::authz::{Role, RoleEditPlan};
use crate::errors::{AppError, AppResult};
use crate::models::auth::UpdateRoleRequest;
use crate::models::user::Identity;

impl Console {
    pub async fn list_users(&self) -> AppResult<Vec<Identity>> {
        self.fetch("users").await
    }

    pub async fn get_user(&self, user_name: &str) -> AppResult<Identity> {
        check_path_segment(user_name)?;
        self.fetch(&format!("users/{user_name}")).await
    }

    /// What the role editor may offer for `user_name`.
    pub async fn role_edit_plan(&self, user_name: &str) -> AppResult<(Identity, RoleEditPlan)> {
        let actor = self.session.identity().ok_or(AppError::TokenExpiredOrInvalid)?;
        let target = self.get_user(user_name).await?;
        let plan = RoleEditPlan::for_target(&actor, &target)?;
        Ok((target, plan))
    }

    /// Change another user's role. The request is checked against the policy
    /// before anything is sent.
    pub async fn update_role(&self, user_name: &str, new_role: Role) -> AppResult<()> {
        let (target, plan) = self.role_edit_plan(user_name).await?;
        plan.validate(new_role).map_err(|err| {
            tracing::warn!(
                target_user = %target.user_name,
                new_role = %new_role,
                error = %err,
                "role update refused locally"
            );
            err
        })?;

        let request = UpdateRoleRequest {
            user_name: target.user_name,
            new_role,
        };
        self.submit("auth/update-role", &request).await?;
        tracing::info!(target_user = %request.user_name, new_role = %new_role, "role updated");
        Ok(())
    }
}
