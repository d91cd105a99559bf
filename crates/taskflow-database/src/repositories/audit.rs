//! Audit log store trait and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use taskflow_core::result::AppResult;
use taskflow_core::types::pagination::{PageRequest, PageResponse};
use taskflow_entity::audit::{AuditFilter, AuditLog, AuditStatistics, NewAuditLog};

use crate::error::{db_error, to_count};

const COLUMNS: &str = "id, timestamp, entity_type, entity_id, operation, username, ip_address, \
                       old_value, new_value, changes, description";

/// Append-only storage for audit entries. Every listing is newest first.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    /// Append one entry.
    async fn insert(&self, entry: &NewAuditLog) -> AppResult<AuditLog>;

    /// Page through every entry.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<AuditLog>>;

    /// Page through entries matching `filter`.
    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLog>>;

    /// Full history of one entity.
    async fn find_for_entity(&self, entity_type: &str, entity_id: i64) -> AppResult<Vec<AuditLog>>;

    /// The `limit` most recent entries.
    async fn recent(&self, limit: u64) -> AppResult<Vec<AuditLog>>;

    /// Aggregate counts.
    async fn statistics(&self) -> AppResult<AuditStatistics>;
}

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the `WHERE` clause for a filter, numbering placeholders from 1.
fn where_clause(filter: &AuditFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut param_idx = 1u32;

    if filter.entity_type.is_some() {
        conditions.push(format!("entity_type = ${param_idx}"));
        param_idx += 1;
    }
    if filter.operation.is_some() {
        conditions.push(format!("operation = ${param_idx}"));
        param_idx += 1;
    }
    if filter.username.is_some() {
        conditions.push(format!("username ILIKE '%' || ${param_idx} || '%'"));
        param_idx += 1;
    }
    if filter.from.is_some() {
        conditions.push(format!("timestamp >= ${param_idx}"));
        param_idx += 1;
    }
    if filter.to.is_some() {
        conditions.push(format!("timestamp <= ${param_idx}"));
        param_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, param_idx)
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn insert(&self, entry: &NewAuditLog) -> AppResult<AuditLog> {
        sqlx::query_as::<_, AuditLog>(&format!(
            "INSERT INTO audit_logs (timestamp, entity_type, entity_id, operation, username, \
             ip_address, old_value, new_value, changes, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COLUMNS}"
        ))
        .bind(entry.timestamp)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(entry.operation)
        .bind(&entry.username)
        .bind(&entry.ip_address)
        .bind(&entry.old_value)
        .bind(&entry.new_value)
        .bind(&entry.changes)
        .bind(&entry.description)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create audit entry"))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<AuditLog>> {
        self.search(&AuditFilter::default(), page).await
    }

    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLog>> {
        let (where_sql, param_idx) = where_clause(filter);

        let count_sql = format!("SELECT COUNT(*) FROM audit_logs {where_sql}");
        let select_sql = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_sql} ORDER BY timestamp DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditLog>(&select_sql);

        if let Some(entity_type) = &filter.entity_type {
            count_query = count_query.bind(entity_type.clone());
            select_query = select_query.bind(entity_type.clone());
        }
        if let Some(operation) = filter.operation {
            count_query = count_query.bind(operation);
            select_query = select_query.bind(operation);
        }
        if let Some(username) = &filter.username {
            count_query = count_query.bind(username.clone());
            select_query = select_query.bind(username.clone());
        }
        if let Some(from) = filter.from {
            count_query = count_query.bind(from);
            select_query = select_query.bind(from);
        }
        if let Some(to) = filter.to {
            count_query = count_query.bind(to);
            select_query = select_query.bind(to);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count audit entries"))?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to search audit log"))?;

        Ok(PageResponse::new(entries, page, to_count(total)))
    }

    async fn find_for_entity(&self, entity_type: &str, entity_id: i64) -> AppResult<Vec<AuditLog>> {
        sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {COLUMNS} FROM audit_logs WHERE entity_type = $1 AND entity_id = $2 \
             ORDER BY timestamp DESC, id DESC"
        ))
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load entity history"))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<AuditLog>> {
        sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {COLUMNS} FROM audit_logs ORDER BY timestamp DESC, id DESC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load recent audit entries"))
    }

    async fn statistics(&self) -> AppResult<AuditStatistics> {
        let by_operation = sqlx::query_as::<_, (String, i64)>(
            "SELECT operation::TEXT, COUNT(*) FROM audit_logs GROUP BY operation",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to count audit entries by operation"))?;

        let by_entity_type = sqlx::query_as::<_, (String, i64)>(
            "SELECT entity_type, COUNT(*) FROM audit_logs GROUP BY entity_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to count audit entries by entity type"))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count audit entries"))?;

        Ok(AuditStatistics {
            by_operation: by_operation
                .into_iter()
                .map(|(k, v)| (k, to_count(v)))
                .collect(),
            by_entity_type: by_entity_type
                .into_iter()
                .map(|(k, v)| (k, to_count(v)))
                .collect(),
            total_logs: to_count(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_entity::audit::OperationType;

    #[test]
    fn test_where_clause_numbers_placeholders() {
        let filter = AuditFilter {
            operation: Some(OperationType::Update),
            username: Some("ali".to_string()),
            ..AuditFilter::default()
        };
        let (sql, next) = where_clause(&filter);
        assert_eq!(
            sql,
            "WHERE operation = $1 AND username ILIKE '%' || $2 || '%'"
        );
        assert_eq!(next, 3);
    }

    #[test]
    fn test_empty_filter_has_no_where() {
        let (sql, next) = where_clause(&AuditFilter::default());
        assert!(sql.is_empty());
        assert_eq!(next, 1);
    }
}
