//! Epic approval and completion.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use taskflow_auth::Principal;
use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::epic::Epic;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::intercept::{AuditedRepository, CallInterceptor};
use crate::notification::{GraphResolver, NotificationDispatcher};

/// Approves and finishes epics, notifying the project manager.
#[derive(Clone)]
pub struct EpicService {
    epics: AuditedRepository<Epic>,
    resolver: GraphResolver,
    dispatcher: NotificationDispatcher,
    calls: CallInterceptor,
}

impl EpicService {
    /// Creates a new epic service.
    pub fn new(
        epics: Arc<dyn Repository<Epic>>,
        recorder: AuditRecorder,
        resolver: GraphResolver,
        dispatcher: NotificationDispatcher,
        calls: CallInterceptor,
    ) -> Self {
        Self {
            epics: AuditedRepository::new(epics, recorder),
            resolver,
            dispatcher,
            calls,
        }
    }

    async fn load(&self, id: i64) -> AppResult<Epic> {
        self.epics
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Epic {id} not found")))
    }

    /// Gets an epic by id.
    pub async fn get(&self, ctx: &RequestContext, id: i64) -> AppResult<Epic> {
        self.calls
            .around(ctx, "EpicService.get", self.load(id))
            .await
    }

    /// Approves the epic. An epic without end date is finished today.
    pub async fn approve(&self, ctx: &RequestContext, id: i64) -> AppResult<Epic> {
        self.calls
            .around(ctx, "EpicService.approve", async {
                ctx.current_user()?;
                let mut epic = self.load(id).await?;
                epic.approve(Utc::now().date_naive());
                let saved = self.epics.for_actor(ctx).save(&epic).await?;
                info!(epic_id = id, end_date = ?saved.end_date, "Epic approved");

                match self.resolver.resolve_epic(&saved).await {
                    Ok(graph) => {
                        self.dispatcher.notify_epic_approved(&graph).await;
                    }
                    Err(e) => warn!(epic_id = id, error = %e, "Cannot resolve epic for notification"),
                }
                Ok(saved)
            })
            .await
    }

    /// Marks the epic finished today.
    pub async fn finish(&self, ctx: &RequestContext, id: i64) -> AppResult<Epic> {
        self.calls
            .around(ctx, "EpicService.finish", async {
                ctx.current_user()?;
                let mut epic = self.load(id).await?;
                if epic.is_finished() {
                    return Err(AppError::validation(format!(
                        "Epic '{}' is already finished",
                        epic.name
                    )));
                }
                epic.end_date = Some(Utc::now().date_naive());
                let saved = self.epics.for_actor(ctx).save(&epic).await?;
                info!(epic_id = id, "Epic finished");

                match self.resolver.resolve_epic(&saved).await {
                    Ok(graph) => {
                        self.dispatcher.notify_epic_finished(&graph).await;
                    }
                    Err(e) => warn!(epic_id = id, error = %e, "Cannot resolve epic for notification"),
                }
                Ok(saved)
            })
            .await
    }
}
