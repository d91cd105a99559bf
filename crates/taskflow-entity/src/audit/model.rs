//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::operation::OperationType;

/// An immutable audit log entry recording one persistence operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    /// Unique audit entry identifier.
    pub id: i64,
    /// When the operation happened.
    pub timestamp: DateTime<Utc>,
    /// Entity type name (e.g. `"Story"`).
    pub entity_type: String,
    /// Affected entity id, when it could be determined.
    pub entity_id: Option<i64>,
    /// The operation performed.
    pub operation: OperationType,
    /// Acting user, `"system"` when there was no request context.
    pub username: String,
    /// Client address, `"unknown"` when there was no request context.
    pub ip_address: String,
    /// Snapshot before the operation.
    pub old_value: Option<serde_json::Value>,
    /// Snapshot after the operation.
    pub new_value: Option<serde_json::Value>,
    /// Field-by-field diff between the snapshots.
    pub changes: Option<serde_json::Value>,
    /// Human-readable summary.
    pub description: String,
}

/// Data required to append a new audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditLog {
    /// When the operation happened.
    pub timestamp: DateTime<Utc>,
    /// Entity type name.
    pub entity_type: String,
    /// Affected entity id.
    pub entity_id: Option<i64>,
    /// The operation performed.
    pub operation: OperationType,
    /// Acting user.
    pub username: String,
    /// Client address.
    pub ip_address: String,
    /// Snapshot before the operation.
    pub old_value: Option<serde_json::Value>,
    /// Snapshot after the operation.
    pub new_value: Option<serde_json::Value>,
    /// Field-by-field diff.
    pub changes: Option<serde_json::Value>,
    /// Human-readable summary.
    pub description: String,
}

impl NewAuditLog {
    /// Attach the store-assigned id.
    pub fn into_log(self, id: i64) -> AuditLog {
        AuditLog {
            id,
            timestamp: self.timestamp,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            operation: self.operation,
            username: self.username,
            ip_address: self.ip_address,
            old_value: self.old_value,
            new_value: self.new_value,
            changes: self.changes,
            description: self.description,
        }
    }
}
