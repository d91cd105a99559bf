//! Role-hierarchy edit permission checks.

use tracing::debug;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_entity::user::User;

use super::principal::Principal;

/// Stateless access-control checker.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl;

impl AccessControl {
    /// Creates a new checker.
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `current` may edit `target`.
    ///
    /// Users may always edit themselves. Otherwise only admins may edit, and
    /// only users whose access level is strictly below their own.
    pub fn check_edit_permission(
        &self,
        current: Option<&User>,
        target: Option<&User>,
    ) -> AppResult<()> {
        let current = current.ok_or_else(|| AppError::forbidden("Current user cannot be null"))?;
        let target = target.ok_or_else(|| AppError::forbidden("Target user cannot be null"))?;

        if current.id.is_some() && current.id == target.id {
            return Ok(());
        }

        if !current.is_admin() {
            debug!(
                current = %current.username,
                target = %target.username,
                "Edit denied: not an administrator"
            );
            return Err(AppError::forbidden(format!(
                "You do not have permission to edit user '{}' (id: {}). \
                 Only administrators can edit other users' profiles.",
                target.username,
                display_id(target.id)
            )));
        }

        let current_level = current.access_level.ok_or_else(|| {
            AppError::forbidden("Your access level is not configured. Please contact administrator.")
        })?;
        let target_level = target.access_level.ok_or_else(|| {
            AppError::forbidden(
                "Target user's access level is not configured. Cannot determine edit permission.",
            )
        })?;

        if target_level >= current_level {
            return Err(AppError::forbidden(format!(
                "Cannot edit user '{}'. Administrators can only edit users with lower access \
                 levels. (Your level: {current_level}, Their level: {target_level})",
                target.username
            )));
        }

        Ok(())
    }

    /// Require an authenticated admin.
    pub fn require_admin<'a>(&self, principal: &'a impl Principal) -> AppResult<&'a User> {
        let user = principal.current_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(AppError::forbidden("Administrator role required"))
        }
    }

    /// Whether the principal is an admin. Resolution failures yield `false`.
    pub fn is_admin(&self, principal: &impl Principal) -> bool {
        principal.current_user().is_ok_and(User::is_admin)
    }

    /// Whether the principal's access level is strictly higher than the
    /// target's. Missing levels or an unresolved principal yield `false`.
    pub fn has_higher_access_level(&self, principal: &impl Principal, target: &User) -> bool {
        let Ok(current) = principal.current_user() else {
            return false;
        };
        match (current.access_level, target.access_level) {
            (Some(current_level), Some(target_level)) => current_level > target_level,
            _ => false,
        }
    }
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
