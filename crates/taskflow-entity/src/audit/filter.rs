//! Audit search filter and aggregate statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::AuditLog;
use super::operation::OperationType;

/// Optional criteria for searching the audit trail. Absent fields match
/// everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Exact entity type.
    pub entity_type: Option<String>,
    /// Exact operation.
    pub operation: Option<OperationType>,
    /// Case-insensitive username substring.
    pub username: Option<String>,
    /// Inclusive lower bound on the timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the timestamp.
    pub to: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Check whether an entry satisfies every present criterion.
    pub fn matches(&self, log: &AuditLog) -> bool {
        if let Some(entity_type) = &self.entity_type {
            if &log.entity_type != entity_type {
                return false;
            }
        }
        if let Some(operation) = self.operation {
            if log.operation != operation {
                return false;
            }
        }
        if let Some(username) = &self.username {
            if !log
                .username
                .to_lowercase()
                .contains(&username.to_lowercase())
            {
                return false;
            }
        }
        if self.from.is_some_and(|from| log.timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| log.timestamp > to) {
            return false;
        }
        true
    }
}

/// Aggregate counts over the whole audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStatistics {
    /// Entries per operation name.
    pub by_operation: BTreeMap<String, u64>,
    /// Entries per entity type.
    pub by_entity_type: BTreeMap<String, u64>,
    /// Total number of entries.
    pub total_logs: u64,
}

impl AuditStatistics {
    /// Tally a list of entries.
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a AuditLog>) -> Self {
        let mut stats = Self::default();
        for log in logs {
            *stats
                .by_operation
                .entry(log.operation.to_string())
                .or_insert(0) += 1;
            *stats
                .by_entity_type
                .entry(log.entity_type.clone())
                .or_insert(0) += 1;
            stats.total_logs += 1;
        }
        stats
    }
}
