//! Read access to the audit trail. Admin only.

use std::sync::Arc;

use taskflow_auth::AccessControl;
use taskflow_core::result::AppResult;
use taskflow_core::types::pagination::{PageRequest, PageResponse};
use taskflow_database::AuditStore;
use taskflow_entity::audit::{AuditFilter, AuditLog, AuditStatistics};

use crate::context::RequestContext;
use crate::intercept::CallInterceptor;

/// Number of entries returned by [`AuditService::recent`].
pub const RECENT_LIMIT: u64 = 100;

/// Queries over the audit trail.
#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    access: AccessControl,
    calls: CallInterceptor,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(store: Arc<dyn AuditStore>, access: AccessControl, calls: CallInterceptor) -> Self {
        Self {
            store,
            access,
            calls,
        }
    }

    /// Page through every entry, newest first.
    pub async fn list(&self, ctx: &RequestContext, page: PageRequest) -> AppResult<PageResponse<AuditLog>> {
        self.calls
            .around(ctx, "AuditService.list", async {
                self.access.require_admin(ctx)?;
                self.store.find_all(&page).await
            })
            .await
    }

    /// Page through entries matching `filter`.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: AuditFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<AuditLog>> {
        self.calls
            .around(ctx, "AuditService.search", async {
                self.access.require_admin(ctx)?;
                self.store.search(&filter, &page).await
            })
            .await
    }

    /// History of one entity, newest first.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        entity_type: &str,
        entity_id: i64,
    ) -> AppResult<Vec<AuditLog>> {
        self.calls
            .around(ctx, "AuditService.history", async {
                self.access.require_admin(ctx)?;
                self.store.find_for_entity(entity_type, entity_id).await
            })
            .await
    }

    /// The most recent entries.
    pub async fn recent(&self, ctx: &RequestContext) -> AppResult<Vec<AuditLog>> {
        self.calls
            .around(ctx, "AuditService.recent", async {
                self.access.require_admin(ctx)?;
                self.store.recent(RECENT_LIMIT).await
            })
            .await
    }

    /// Counts by operation and entity type.
    pub async fn statistics(&self, ctx: &RequestContext) -> AppResult<AuditStatistics> {
        self.calls
            .around(ctx, "AuditService.statistics", async {
                self.access.require_admin(ctx)?;
                self.store.statistics().await
            })
            .await
    }
}
