//! In-memory audit store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::types::pagination::{PageRequest, PageResponse};
use taskflow_entity::audit::{AuditFilter, AuditLog, AuditStatistics, NewAuditLog};

use crate::repositories::AuditStore;

/// An `AuditStore` holding entries in insertion order.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    entries: Mutex<Vec<AuditLog>>,
    failing: AtomicBool,
}

impl MemoryAuditStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of every entry, oldest first.
    pub async fn entries(&self) -> Vec<AuditLog> {
        self.entries.lock().await.clone()
    }

    async fn newest_first(&self, filter: &AuditFilter) -> Vec<AuditLog> {
        let entries = self.entries.lock().await;
        let mut matching: Vec<AuditLog> = entries
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        matching
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, entry: &NewAuditLog) -> AppResult<AuditLog> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::database("Audit store is unavailable"));
        }
        let mut entries = self.entries.lock().await;
        let id = entries.len() as i64 + 1;
        let log = entry.clone().into_log(id);
        entries.push(log.clone());
        Ok(log)
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<AuditLog>> {
        self.search(&AuditFilter::default(), page).await
    }

    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLog>> {
        Ok(PageResponse::from_vec(self.newest_first(filter).await, page))
    }

    async fn find_for_entity(&self, entity_type: &str, entity_id: i64) -> AppResult<Vec<AuditLog>> {
        let filter = AuditFilter {
            entity_type: Some(entity_type.to_string()),
            ..AuditFilter::default()
        };
        Ok(self
            .newest_first(&filter)
            .await
            .into_iter()
            .filter(|log| log.entity_id == Some(entity_id))
            .collect())
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<AuditLog>> {
        let mut all = self.newest_first(&AuditFilter::default()).await;
        all.truncate(limit as usize);
        Ok(all)
    }

    async fn statistics(&self) -> AppResult<AuditStatistics> {
        Ok(AuditStatistics::from_logs(self.entries.lock().await.iter()))
    }
}
