//! SLA rule enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The moment an SLA clock starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sla_start_point", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaStartPoint {
    /// When the task was created.
    #[default]
    TaskCreation,
    /// When the task entered the target state.
    StateEntry,
}

/// Escalation priority of an SLA rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sla_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaPriority {
    /// Escalate first.
    High,
    /// Normal priority.
    #[default]
    Medium,
    /// Escalate last.
    Low,
}

impl fmt::Display for SlaPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}
