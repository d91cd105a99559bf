//! Builds and stores audit entries without ever failing the caller.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use taskflow_core::result::AppResult;
use taskflow_database::AuditStore;
use taskflow_entity::audit::{AuditLog, NewAuditLog, OperationType};

use super::diff::compute_changes;
use crate::context::RequestContext;

/// Who performed an audited operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditActor {
    /// Acting username.
    pub username: String,
    /// Client address.
    pub ip_address: String,
}

impl AuditActor {
    /// The actor used when no request context is available.
    pub fn system() -> Self {
        Self {
            username: "system".to_string(),
            ip_address: "unknown".to_string(),
        }
    }
}

impl Default for AuditActor {
    fn default() -> Self {
        Self::system()
    }
}

impl From<&RequestContext> for AuditActor {
    fn from(ctx: &RequestContext) -> Self {
        Self {
            username: ctx.username().to_string(),
            ip_address: ctx.ip().to_string(),
        }
    }
}

/// Persists audit entries. Cloning is cheap.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    /// Creates a new recorder over the given store.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Record one operation.
    ///
    /// Snapshots are serialized to JSON; when both exist the field diff is
    /// stored as well. Serialization or store failures are logged at `warn`
    /// and yield `None`.
    #[allow(clippy::too_many_arguments)]
    pub async fn log_operation<T: Serialize + ?Sized>(
        &self,
        actor: &AuditActor,
        entity_type: &str,
        entity_id: Option<i64>,
        operation: OperationType,
        old_value: Option<&T>,
        new_value: Option<&T>,
        description: &str,
    ) -> Option<AuditLog> {
        let result = self
            .try_log(
                actor,
                entity_type,
                entity_id,
                operation,
                old_value,
                new_value,
                description,
            )
            .await;

        match result {
            Ok(log) => {
                debug!(
                    audit_id = log.id,
                    entity_type,
                    entity_id,
                    operation = %operation,
                    username = %actor.username,
                    "Audit entry recorded"
                );
                Some(log)
            }
            Err(e) => {
                warn!(
                    entity_type,
                    entity_id,
                    operation = %operation,
                    error = %e,
                    "Failed to record audit entry"
                );
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn try_log<T: Serialize + ?Sized>(
        &self,
        actor: &AuditActor,
        entity_type: &str,
        entity_id: Option<i64>,
        operation: OperationType,
        old_value: Option<&T>,
        new_value: Option<&T>,
        description: &str,
    ) -> AppResult<AuditLog> {
        let old_json = old_value.map(serde_json::to_value).transpose()?;
        let new_json = new_value.map(serde_json::to_value).transpose()?;
        let changes = match (&old_json, &new_json) {
            (Some(old), Some(new)) => Some(compute_changes(old, new)),
            _ => None,
        };

        let entry = NewAuditLog {
            timestamp: Utc::now(),
            entity_type: entity_type.to_string(),
            entity_id,
            operation,
            username: actor.username.clone(),
            ip_address: actor.ip_address.clone(),
            old_value: old_json,
            new_value: new_json,
            changes,
            description: description.to_string(),
        };
        self.store.insert(&entry).await
    }
}
