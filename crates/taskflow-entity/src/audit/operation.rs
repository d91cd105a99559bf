//! Audited operation kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of persistence operation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_operation", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    /// A new entity was inserted.
    Create,
    /// An existing entity was modified.
    Update,
    /// An entity was removed.
    Delete,
    /// An entity was read.
    Read,
}

impl OperationType {
    /// Return the operation as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Read => "READ",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = taskflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "READ" => Ok(Self::Read),
            _ => Err(taskflow_core::AppError::validation(format!(
                "Invalid operation type: '{s}'. Expected one of: CREATE, UPDATE, DELETE, READ"
            ))),
        }
    }
}
