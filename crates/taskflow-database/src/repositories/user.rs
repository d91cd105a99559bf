//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::user::User;

use crate::error::{db_error, to_count};

const COLUMNS: &str =
    "id, username, email, role, access_level, job_title, department, reporting_to, created_at";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    fn name(&self) -> &str {
        "UserRepository"
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users"))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        match user.id {
            None => sqlx::query_as::<_, User>(&format!(
                "INSERT INTO users (username, email, role, access_level, job_title, department, \
                 reporting_to, created_at) VALUES ($1, $2, UPPER($3), $4, $5, $6, $7, \
                 COALESCE($8, NOW())) RETURNING {COLUMNS}"
            ))
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.role)
            .bind(user.access_level)
            .bind(&user.job_title)
            .bind(&user.department)
            .bind(user.reporting_to)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create user")),
            Some(id) => sqlx::query_as::<_, User>(&format!(
                "UPDATE users SET username = $2, email = $3, role = UPPER($4), access_level = $5, \
                 job_title = $6, department = $7, reporting_to = $8 \
                 WHERE id = $1 RETURNING {COLUMNS}"
            ))
            .bind(id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.role)
            .bind(user.access_level)
            .bind(&user.job_title)
            .bind(&user.department)
            .bind(user.reporting_to)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update user"))?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found"))),
        }
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        if let Some(id) = user.id {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))?;
        Ok(to_count(total))
    }
}
