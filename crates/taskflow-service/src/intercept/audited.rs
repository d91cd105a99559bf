//! Repository decorator that writes one audit entry per successful write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use taskflow_core::result::AppResult;
use taskflow_core::traits::{Entity, Repository};
use taskflow_entity::audit::OperationType;

use crate::audit::{AuditActor, AuditRecorder};
use crate::context::RequestContext;

/// Wraps a store and audits `save`, `delete` and `delete_by_id`.
///
/// Reads pass straight through. A failed write propagates its error and is
/// not audited; a failed audit write never affects the result.
pub struct AuditedRepository<E: Entity> {
    inner: Arc<dyn Repository<E>>,
    recorder: AuditRecorder,
    actor: AuditActor,
}

impl<E: Entity> AuditedRepository<E> {
    /// Wrap `inner`, attributing writes to the system actor.
    pub fn new(inner: Arc<dyn Repository<E>>, recorder: AuditRecorder) -> Self {
        Self {
            inner,
            recorder,
            actor: AuditActor::system(),
        }
    }

    /// A copy of this decorator that attributes writes to `ctx`.
    pub fn for_actor(&self, ctx: &RequestContext) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            recorder: self.recorder.clone(),
            actor: AuditActor::from(ctx),
        }
    }
}

impl<E: Entity> Clone for AuditedRepository<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            recorder: self.recorder.clone(),
            actor: self.actor.clone(),
        }
    }
}

/// `"StoryRepository"` → `"Story"`. Names without the suffix are kept.
pub fn entity_type_from_store_name(name: &str) -> &str {
    name.strip_suffix("Repository").unwrap_or(name)
}

#[async_trait]
impl<E: Entity> Repository<E> for AuditedRepository<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        self.inner.find_all().await
    }

    async fn save(&self, entity: &E) -> AppResult<E> {
        match entity.id() {
            None => {
                let saved = self.inner.save(entity).await?;
                self.recorder
                    .log_operation(
                        &self.actor,
                        E::ENTITY_TYPE,
                        saved.id(),
                        OperationType::Create,
                        None,
                        Some(&saved),
                        &format!("Created new {}", E::ENTITY_TYPE),
                    )
                    .await;
                Ok(saved)
            }
            Some(id) => {
                let before = match self.inner.find_by_id(id).await {
                    Ok(Some(existing)) => existing,
                    Ok(None) => entity.clone(),
                    Err(e) => {
                        debug!(
                            entity_type = E::ENTITY_TYPE,
                            entity_id = id,
                            error = %e,
                            "Pre-update snapshot unavailable, using argument"
                        );
                        entity.clone()
                    }
                };
                let saved = self.inner.save(entity).await?;
                self.recorder
                    .log_operation(
                        &self.actor,
                        E::ENTITY_TYPE,
                        saved.id(),
                        OperationType::Update,
                        Some(&before),
                        Some(&saved),
                        &format!("Updated {}", E::ENTITY_TYPE),
                    )
                    .await;
                Ok(saved)
            }
        }
    }

    async fn delete(&self, entity: &E) -> AppResult<()> {
        self.inner.delete(entity).await?;
        self.recorder
            .log_operation(
                &self.actor,
                E::ENTITY_TYPE,
                entity.id(),
                OperationType::Delete,
                Some(entity),
                None,
                &format!("Deleted {}", E::ENTITY_TYPE),
            )
            .await;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let removed = self.inner.delete_by_id(id).await?;
        let entity_type = entity_type_from_store_name(self.inner.name());
        self.recorder
            .log_operation::<E>(
                &self.actor,
                entity_type,
                Some(id),
                OperationType::Delete,
                None,
                None,
                &format!("Deleted {entity_type} by ID"),
            )
            .await;
        Ok(removed)
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }
}
