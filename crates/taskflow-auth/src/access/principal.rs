//! Resolution of the acting user.

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_entity::user::User;

/// Something that can name the user performing the current operation.
pub trait Principal {
    /// The authenticated user, if there is one.
    fn user(&self) -> Option<&User>;

    /// The authenticated user, or a permission error when absent.
    fn current_user(&self) -> AppResult<&User> {
        self.user()
            .ok_or_else(|| AppError::forbidden("User is not authenticated"))
    }
}

impl Principal for User {
    fn user(&self) -> Option<&User> {
        Some(self)
    }
}

impl Principal for Option<User> {
    fn user(&self) -> Option<&User> {
        self.as_ref()
    }
}
