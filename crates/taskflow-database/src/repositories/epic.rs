//! Epic repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::epic::Epic;

use crate::error::{db_error, to_count};

const COLUMNS: &str = "id, name, project_id, manager_id, created_by, start_date, end_date, \
                       deadline, is_approved, deliverables";

/// Repository for epics.
#[derive(Debug, Clone)]
pub struct EpicRepository {
    pool: PgPool,
}

impl EpicRepository {
    /// Create a new epic repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Epic> for EpicRepository {
    fn name(&self) -> &str {
        "EpicRepository"
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Epic>> {
        sqlx::query_as::<_, Epic>(&format!("SELECT {COLUMNS} FROM epics WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find epic"))
    }

    async fn find_all(&self) -> AppResult<Vec<Epic>> {
        sqlx::query_as::<_, Epic>(&format!("SELECT {COLUMNS} FROM epics ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list epics"))
    }

    async fn save(&self, epic: &Epic) -> AppResult<Epic> {
        match epic.id {
            None => sqlx::query_as::<_, Epic>(&format!(
                "INSERT INTO epics (name, project_id, manager_id, created_by, start_date, end_date, \
                 deadline, is_approved, deliverables) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
            ))
            .bind(&epic.name)
            .bind(epic.project_id)
            .bind(epic.manager_id)
            .bind(epic.created_by)
            .bind(epic.start_date)
            .bind(epic.end_date)
            .bind(epic.deadline)
            .bind(epic.is_approved)
            .bind(&epic.deliverables)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create epic")),
            Some(id) => sqlx::query_as::<_, Epic>(&format!(
                "UPDATE epics SET name = $2, project_id = $3, manager_id = $4, created_by = $5, \
                 start_date = $6, end_date = $7, deadline = $8, is_approved = $9, deliverables = $10 \
                 WHERE id = $1 RETURNING {COLUMNS}"
            ))
            .bind(id)
            .bind(&epic.name)
            .bind(epic.project_id)
            .bind(epic.manager_id)
            .bind(epic.created_by)
            .bind(epic.start_date)
            .bind(epic.end_date)
            .bind(epic.deadline)
            .bind(epic.is_approved)
            .bind(&epic.deliverables)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update epic"))?
            .ok_or_else(|| AppError::not_found(format!("Epic {id} not found"))),
        }
    }

    async fn delete(&self, epic: &Epic) -> AppResult<()> {
        if let Some(id) = epic.id {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM epics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete epic"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM epics")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count epics"))?;
        Ok(to_count(total))
    }
}
