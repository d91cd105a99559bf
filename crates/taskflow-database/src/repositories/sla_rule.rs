//! SLA rule repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::sla_rule::SlaRule;

use crate::error::{db_error, to_count};

const COLUMNS: &str = "id, project_id, state_id, duration_hours, start_point, \
                       escalation_delay_hours, priority, notify_email";

/// Repository for SLA rules.
#[derive(Debug, Clone)]
pub struct SlaRuleRepository {
    pool: PgPool,
}

impl SlaRuleRepository {
    /// Create a new SLA rule repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<SlaRule> for SlaRuleRepository {
    fn name(&self) -> &str {
        "SlaRuleRepository"
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<SlaRule>> {
        sqlx::query_as::<_, SlaRule>(&format!("SELECT {COLUMNS} FROM sla_rules WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find SLA rule"))
    }

    async fn find_all(&self) -> AppResult<Vec<SlaRule>> {
        sqlx::query_as::<_, SlaRule>(&format!("SELECT {COLUMNS} FROM sla_rules ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list SLA rules"))
    }

    async fn save(&self, rule: &SlaRule) -> AppResult<SlaRule> {
        match rule.id {
            None => sqlx::query_as::<_, SlaRule>(&format!(
                "INSERT INTO sla_rules (project_id, state_id, duration_hours, start_point, \
                 escalation_delay_hours, priority, notify_email) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
            ))
            .bind(rule.project_id)
            .bind(rule.state_id)
            .bind(rule.duration_hours)
            .bind(rule.start_point)
            .bind(rule.escalation_delay_hours)
            .bind(rule.priority)
            .bind(rule.notify_email)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create SLA rule")),
            Some(id) => sqlx::query_as::<_, SlaRule>(&format!(
                "UPDATE sla_rules SET project_id = $2, state_id = $3, duration_hours = $4, \
                 start_point = $5, escalation_delay_hours = $6, priority = $7, notify_email = $8 \
                 WHERE id = $1 RETURNING {COLUMNS}"
            ))
            .bind(id)
            .bind(rule.project_id)
            .bind(rule.state_id)
            .bind(rule.duration_hours)
            .bind(rule.start_point)
            .bind(rule.escalation_delay_hours)
            .bind(rule.priority)
            .bind(rule.notify_email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update SLA rule"))?
            .ok_or_else(|| AppError::not_found(format!("SLA rule {id} not found"))),
        }
    }

    async fn delete(&self, rule: &SlaRule) -> AppResult<()> {
        if let Some(id) = rule.id {
            self.delete_by_id(id).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sla_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete SLA rule"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sla_rules")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count SLA rules"))?;
        Ok(to_count(total))
    }
}
