//! Generic in-memory entity store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::{Entity, Repository};

/// A `Repository` backed by an ordered map keyed by id.
#[derive(Debug)]
pub struct MemoryRepository<E> {
    name: String,
    rows: Mutex<BTreeMap<i64, E>>,
    next_id: AtomicI64,
    failing: AtomicBool,
}

impl<E: Entity> MemoryRepository<E> {
    /// Create an empty store named after the entity (e.g. `StoryRepository`).
    pub fn new() -> Self {
        Self::named(format!("{}Repository", E::ENTITY_TYPE))
    }

    /// Create an empty store with an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
        }
    }

    /// Insert entities as-is. Entities without an id get the next free one.
    pub async fn seed(&self, entities: impl IntoIterator<Item = E>) {
        let mut rows = self.rows.lock().await;
        for mut entity in entities {
            let id = match entity.id() {
                Some(id) => {
                    self.next_id.fetch_max(id + 1, Ordering::SeqCst);
                    id
                }
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                    entity.set_id(id);
                    id
                }
            };
            rows.insert(id, entity);
        }
    }

    /// Make every subsequent call fail with a data-access error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::database(format!("{} is unavailable", self.name)));
        }
        Ok(())
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        self.check()?;
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        self.check()?;
        Ok(self.rows.lock().await.values().cloned().collect())
    }

    async fn save(&self, entity: &E) -> AppResult<E> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        match entity.id() {
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let mut saved = entity.clone();
                saved.set_id(id);
                rows.insert(id, saved.clone());
                Ok(saved)
            }
            Some(id) => match rows.get_mut(&id) {
                Some(row) => {
                    *row = entity.clone();
                    Ok(entity.clone())
                }
                None => Err(AppError::not_found(format!(
                    "{} {id} not found",
                    E::ENTITY_TYPE
                ))),
            },
        }
    }

    async fn delete(&self, entity: &E) -> AppResult<()> {
        if let Some(id) = entity.id() {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        self.check()?;
        Ok(self.rows.lock().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        self.check()?;
        Ok(self.rows.lock().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_entity::story::Story;

    fn story(title: &str) -> Story {
        Story {
            title: title.to_string(),
            ..Story::default()
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = MemoryRepository::<Story>::new();
        let first = repo.save(&story("a")).await.unwrap();
        let second = repo.save(&story("b")).await.unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.name(), "StoryRepository");
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let repo = MemoryRepository::<Story>::new();
        let mut ghost = story("ghost");
        ghost.id = Some(42);
        let err = repo.save(&ghost).await.unwrap_err();
        assert_eq!(err.kind, taskflow_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_seed_keeps_ids_and_advances_counter() {
        let repo = MemoryRepository::<Story>::new();
        let mut seeded = story("seeded");
        seeded.id = Some(10);
        repo.seed([seeded]).await;
        let next = repo.save(&story("next")).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn test_failing_store_rejects_reads() {
        let repo = MemoryRepository::<Story>::new();
        repo.set_failing(true);
        assert!(repo.find_all().await.is_err());
        repo.set_failing(false);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
