//! Generic repository trait for entity persistence.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::entity::Entity;

/// Generic CRUD repository trait.
///
/// Implemented by the PostgreSQL stores, the in-memory store and the audit
/// decorator, so callers never know which one they hold.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Store name, e.g. `"StoryRepository"`.
    fn name(&self) -> &str;

    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>>;

    /// Load every entity, ordered by id.
    async fn find_all(&self) -> AppResult<Vec<E>>;

    /// Insert the entity when it has no id, update it otherwise.
    async fn save(&self, entity: &E) -> AppResult<E>;

    /// Delete the given entity. Deleting an entity without an id is a no-op.
    async fn delete(&self, entity: &E) -> AppResult<()>;

    /// Delete by primary key. Returns `true` if a row was removed.
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;

    /// Count total entities.
    async fn count(&self) -> AppResult<u64>;
}
