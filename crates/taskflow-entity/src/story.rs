//! Story (task) entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::traits::Entity;
use validator::Validate;

/// A unit of work assigned to a user. The story's manager is the manager of
/// its project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Story {
    /// Unique story identifier, `None` until saved.
    pub id: Option<i64>,
    /// Short title.
    pub title: String,
    /// Deliverables / description.
    pub description: Option<String>,
    /// Assigned user.
    pub assignee_id: Option<i64>,
    /// User who created the story.
    pub created_by: Option<i64>,
    /// Owning project.
    pub project_id: Option<i64>,
    /// Epic (workflow state) the story belongs to.
    pub epic_id: Option<i64>,
    /// Date the work is due.
    pub due_date: Option<NaiveDate>,
    /// Hard deadline.
    pub deadline: Option<NaiveDate>,
    /// Whether the story has been approved as complete.
    pub is_approved: bool,
    /// Completion date.
    pub end_date: Option<NaiveDate>,
    /// Estimated effort in hours.
    pub estimated_hours: Option<f64>,
    /// Logged effort in hours.
    pub actual_hours: Option<f64>,
    /// When the story was created.
    pub created_at: Option<DateTime<Utc>>,
}

impl Story {
    /// A story is overdue when its due date lies strictly before `today` and
    /// it has not been approved.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_approved && self.due_date.is_some_and(|due| due < today)
    }

    /// Whole hours elapsed since creation, truncated. `None` when the
    /// creation time is unknown.
    pub fn hours_since_creation(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at
            .map(|created| now.signed_duration_since(created).num_hours())
    }
}

impl Entity for Story {
    const ENTITY_TYPE: &'static str = "Story";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Data required to create a new story.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateStory {
    /// Short title.
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub title: String,
    /// Deliverables / description.
    pub description: Option<String>,
    /// Assigned user.
    pub assignee_id: Option<i64>,
    /// Owning project.
    pub project_id: Option<i64>,
    /// Epic the story belongs to.
    pub epic_id: Option<i64>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Hard deadline.
    pub deadline: Option<NaiveDate>,
    /// Estimated effort in hours.
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
}

impl CreateStory {
    /// Build an unsaved story created by `created_by` at `now`.
    pub fn into_story(self, created_by: Option<i64>, now: DateTime<Utc>) -> Story {
        Story {
            id: None,
            title: self.title,
            description: self.description,
            assignee_id: self.assignee_id,
            created_by,
            project_id: self.project_id,
            epic_id: self.epic_id,
            due_date: self.due_date,
            deadline: self.deadline,
            is_approved: false,
            end_date: None,
            estimated_hours: self.estimated_hours,
            actual_hours: None,
            created_at: Some(now),
        }
    }
}

/// Partial update of a story. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStory {
    /// New title.
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Move the story to another epic.
    pub epic_id: Option<i64>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New deadline.
    pub deadline: Option<NaiveDate>,
    /// New estimate.
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
    /// New logged effort.
    #[validate(range(min = 0.0))]
    pub actual_hours: Option<f64>,
}

impl UpdateStory {
    /// Apply the present fields to `story`.
    pub fn apply(self, story: &mut Story) {
        if let Some(title) = self.title {
            story.title = title;
        }
        if let Some(description) = self.description {
            story.description = Some(description);
        }
        if let Some(epic_id) = self.epic_id {
            story.epic_id = Some(epic_id);
        }
        if let Some(due) = self.due_date {
            story.due_date = Some(due);
        }
        if let Some(deadline) = self.deadline {
            story.deadline = Some(deadline);
        }
        if let Some(hours) = self.estimated_hours {
            story.estimated_hours = Some(hours);
        }
        if let Some(hours) = self.actual_hours {
            story.actual_hours = Some(hours);
        }
    }
}
