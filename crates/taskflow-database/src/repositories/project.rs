//! Project repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::project::Project;

use crate::error::{db_error, to_count};

const COLUMNS: &str =
    "id, name, manager_id, created_by, deliverables, deadline, is_approved, end_date";

/// Repository for projects.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Project> for ProjectRepository {
    fn name(&self) -> &str {
        "ProjectRepository"
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM projects WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find project"))
    }

    async fn find_all(&self) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM projects ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list projects"))
    }

    async fn save(&self, project: &Project) -> AppResult<Project> {
        match project.id {
            None => sqlx::query_as::<_, Project>(&format!(
                "INSERT INTO projects (name, manager_id, created_by, deliverables, deadline, \
                 is_approved, end_date) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
            ))
            .bind(&project.name)
            .bind(project.manager_id)
            .bind(project.created_by)
            .bind(&project.deliverables)
            .bind(project.deadline)
            .bind(project.is_approved)
            .bind(project.end_date)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create project")),
            Some(id) => sqlx::query_as::<_, Project>(&format!(
                "UPDATE projects SET name = $2, manager_id = $3, created_by = $4, deliverables = $5, \
                 deadline = $6, is_approved = $7, end_date = $8 WHERE id = $1 RETURNING {COLUMNS}"
            ))
            .bind(id)
            .bind(&project.name)
            .bind(project.manager_id)
            .bind(project.created_by)
            .bind(&project.deliverables)
            .bind(project.deadline)
            .bind(project.is_approved)
            .bind(project.end_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update project"))?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found"))),
        }
    }

    async fn delete(&self, project: &Project) -> AppResult<()> {
        if let Some(id) = project.id {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete project"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count projects"))?;
        Ok(to_count(total))
    }
}
