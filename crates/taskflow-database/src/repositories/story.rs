//! Story repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::story::Story;

use crate::error::{db_error, to_count};

const COLUMNS: &str = "id, title, description, assignee_id, created_by, project_id, epic_id, \
                       due_date, deadline, is_approved, end_date, estimated_hours, actual_hours, \
                       created_at";

/// Repository for stories.
#[derive(Debug, Clone)]
pub struct StoryRepository {
    pool: PgPool,
}

impl StoryRepository {
    /// Create a new story repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, story: &Story) -> AppResult<Story> {
        sqlx::query_as::<_, Story>(&format!(
            "INSERT INTO stories (title, description, assignee_id, created_by, project_id, epic_id, \
             due_date, deadline, is_approved, end_date, estimated_hours, actual_hours, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, NOW())) \
             RETURNING {COLUMNS}"
        ))
        .bind(&story.title)
        .bind(&story.description)
        .bind(story.assignee_id)
        .bind(story.created_by)
        .bind(story.project_id)
        .bind(story.epic_id)
        .bind(story.due_date)
        .bind(story.deadline)
        .bind(story.is_approved)
        .bind(story.end_date)
        .bind(story.estimated_hours)
        .bind(story.actual_hours)
        .bind(story.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create story"))
    }

    async fn update(&self, id: i64, story: &Story) -> AppResult<Story> {
        sqlx::query_as::<_, Story>(&format!(
            "UPDATE stories SET title = $2, description = $3, assignee_id = $4, created_by = $5, \
             project_id = $6, epic_id = $7, due_date = $8, deadline = $9, is_approved = $10, \
             end_date = $11, estimated_hours = $12, actual_hours = $13 \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&story.title)
        .bind(&story.description)
        .bind(story.assignee_id)
        .bind(story.created_by)
        .bind(story.project_id)
        .bind(story.epic_id)
        .bind(story.due_date)
        .bind(story.deadline)
        .bind(story.is_approved)
        .bind(story.end_date)
        .bind(story.estimated_hours)
        .bind(story.actual_hours)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update story"))?
        .ok_or_else(|| AppError::not_found(format!("Story {id} not found")))
    }
}

#[async_trait]
impl Repository<Story> for StoryRepository {
    fn name(&self) -> &str {
        "StoryRepository"
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Story>> {
        sqlx::query_as::<_, Story>(&format!("SELECT {COLUMNS} FROM stories WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find story"))
    }

    async fn find_all(&self) -> AppResult<Vec<Story>> {
        sqlx::query_as::<_, Story>(&format!("SELECT {COLUMNS} FROM stories ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list stories"))
    }

    async fn save(&self, story: &Story) -> AppResult<Story> {
        match story.id {
            None => self.insert(story).await,
            Some(id) => self.update(id, story).await,
        }
    }

    async fn delete(&self, story: &Story) -> AppResult<()> {
        if let Some(id) = story.id {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete story"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stories")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count stories"))?;
        Ok(to_count(total))
    }
}
