//! SLA rule entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::traits::Entity;

use super::policy::{SlaPriority, SlaStartPoint};

/// A service-level rule: tasks sitting in `state_id` longer than
/// `duration_hours` are in breach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SlaRule {
    /// Unique rule identifier, `None` until saved.
    pub id: Option<i64>,
    /// Project the rule applies to.
    pub project_id: Option<i64>,
    /// Target state (an epic id).
    pub state_id: Option<i64>,
    /// Allowed duration before breach, in hours.
    pub duration_hours: i32,
    /// When the clock starts.
    pub start_point: SlaStartPoint,
    /// Hours after breach before escalation.
    pub escalation_delay_hours: i32,
    /// Escalation priority.
    pub priority: SlaPriority,
    /// Whether breaches are announced by email.
    pub notify_email: bool,
}

impl SlaRule {
    /// Display name used in notifications, e.g. `SLA#12`.
    pub fn display_name(&self) -> String {
        match self.id {
            Some(id) => format!("SLA#{id}"),
            None => "SLA#new".to_string(),
        }
    }

    /// Whether the sweep should evaluate this rule at all.
    pub fn is_active(&self) -> bool {
        self.notify_email && self.state_id.is_some()
    }

    /// Whether `elapsed_hours` is strictly past the threshold.
    pub fn is_breached_after(&self, elapsed_hours: i64) -> bool {
        elapsed_hours > i64::from(self.duration_hours)
    }
}

impl Entity for SlaRule {
    const ENTITY_TYPE: &'static str = "SlaRule";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_without_state_is_inactive() {
        let rule = SlaRule {
            id: Some(3),
            notify_email: true,
            ..SlaRule::default()
        };
        assert!(!rule.is_active());
        assert_eq!(rule.display_name(), "SLA#3");
    }

    #[test]
    fn test_breach_is_strictly_greater() {
        let rule = SlaRule {
            duration_hours: 24,
            ..SlaRule::default()
        };
        assert!(!rule.is_breached_after(24));
        assert!(rule.is_breached_after(25));
    }
}
