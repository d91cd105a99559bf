//! Project entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::traits::Entity;

/// A project. Its manager is the manager of every story inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier, `None` until saved.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Responsible manager.
    pub manager_id: Option<i64>,
    /// User who created the project.
    pub created_by: Option<i64>,
    /// Deliverables.
    pub deliverables: Option<String>,
    /// Hard deadline.
    pub deadline: Option<NaiveDate>,
    /// Approval flag.
    pub is_approved: bool,
    /// Completion date.
    pub end_date: Option<NaiveDate>,
}

impl Entity for Project {
    const ENTITY_TYPE: &'static str = "Project";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
