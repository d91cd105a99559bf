//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::traits::Entity;
use validator::Validate;

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier, `None` until saved.
    pub id: Option<i64>,
    /// Unique login name.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Role name, compared case-insensitively.
    pub role: Option<String>,
    /// Numeric access level; higher means more privileged.
    pub access_level: Option<i32>,
    /// Job title.
    pub job_title: Option<String>,
    /// Department name.
    pub department: Option<String>,
    /// The user this user reports to.
    pub reporting_to: Option<i64>,
    /// When the user was created.
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if this user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.trim().eq_ignore_ascii_case("ADMIN"))
    }

    /// Email address if present and not blank.
    pub fn usable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

impl Entity for User {
    const ENTITY_TYPE: &'static str = "User";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    /// Desired username.
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub username: String,
    /// Email address (optional).
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    /// Role name; parsed case-insensitively.
    pub role: String,
    /// Explicit access level, otherwise the role default is used.
    #[validate(range(min = 0, max = 10))]
    pub access_level: Option<i32>,
    /// Job title.
    pub job_title: Option<String>,
    /// Department name.
    pub department: Option<String>,
    /// Manager of the new user.
    pub reporting_to: Option<i64>,
}

/// Partial update of a user profile. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    /// New email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    /// New role name.
    pub role: Option<String>,
    /// New access level.
    #[validate(range(min = 0, max = 10))]
    pub access_level: Option<i32>,
    /// New job title.
    pub job_title: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New manager.
    pub reporting_to: Option<i64>,
}
