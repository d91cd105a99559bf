//! Epic entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::traits::Entity;

/// A group of stories inside a project. Epics double as workflow states
/// targeted by SLA rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Epic {
    /// Unique epic identifier, `None` until saved.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Owning project.
    pub project_id: Option<i64>,
    /// Responsible manager.
    pub manager_id: Option<i64>,
    /// User who created the epic.
    pub created_by: Option<i64>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date; set means the epic is finished.
    pub end_date: Option<NaiveDate>,
    /// Hard deadline.
    pub deadline: Option<NaiveDate>,
    /// Approval flag.
    pub is_approved: bool,
    /// Deliverables.
    pub deliverables: Option<String>,
}

impl Epic {
    /// Whether the epic has an end date.
    pub fn is_finished(&self) -> bool {
        self.end_date.is_some()
    }

    /// Mark the epic approved, stamping `today` as end date if none is set.
    pub fn approve(&mut self, today: NaiveDate) {
        self.is_approved = true;
        if self.end_date.is_none() {
            self.end_date = Some(today);
        }
    }
}

impl Entity for Epic {
    const ENTITY_TYPE: &'static str = "Epic";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
