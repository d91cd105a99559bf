//! Embedded schema bootstrap.

use sqlx::PgPool;
use tracing::info;

use taskflow_core::error::{AppError, ErrorKind};

/// Apply the embedded schema if it has not been applied yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying database schema");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to apply schema: {e}"),
                e,
            )
        })?;

    info!("Database schema is up to date");
    Ok(())
}
