//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles known to the system.
///
/// The role column itself is free text; this enum is used to normalise
/// input and pick the default access level for new accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// System administrator.
    Admin,
    /// Project or epic manager.
    Manager,
    /// Regular employee.
    Employee,
    /// Any other account.
    User,
}

impl UserRole {
    /// Access level given to new accounts with this role.
    pub fn default_access_level(&self) -> i32 {
        match self {
            Self::Admin => 5,
            Self::Manager => 4,
            Self::Employee => 2,
            Self::User => 1,
        }
    }

    /// Return the role as stored (upper case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Employee => "EMPLOYEE",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = taskflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "EMPLOYEE" => Ok(Self::Employee),
            "USER" => Ok(Self::User),
            _ => Err(taskflow_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: ADMIN, MANAGER, EMPLOYEE, USER"
            ))),
        }
    }
}
