//! Typed identity accessor shared by every persisted entity.

use serde::Serialize;

/// A persisted domain entity with a numeric surrogate key.
///
/// `id()` returns `None` until the entity has been saved. The audit layer
/// reads ids and type names through this trait instead of inspecting the
/// serialized form.
pub trait Entity: Serialize + Clone + Send + Sync + 'static {
    /// Entity type name recorded in audit entries (e.g. `"Story"`).
    const ENTITY_TYPE: &'static str;

    /// Primary key, if assigned.
    fn id(&self) -> Option<i64>;

    /// Assign the primary key after insertion.
    fn set_id(&mut self, id: i64);

    /// Whether this entity has never been persisted.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}
