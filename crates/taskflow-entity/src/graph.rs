//! Resolved entity graphs used when addressing notifications.

use serde::{Deserialize, Serialize};

use crate::epic::Epic;
use crate::project::Project;
use crate::story::Story;
use crate::user::User;

/// A story together with the related records a notification may need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryGraph {
    /// The story itself.
    pub story: Story,
    /// The owning project, if any.
    pub project: Option<Project>,
    /// The assigned user, if any.
    pub assignee: Option<User>,
    /// The project's manager, if any.
    pub manager: Option<User>,
}

impl StoryGraph {
    /// Project name, or an empty string when the story has no project.
    pub fn project_name(&self) -> &str {
        self.project.as_ref().map_or("", |p| p.name.as_str())
    }
}

/// An epic together with its project's manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicGraph {
    /// The epic itself.
    pub epic: Epic,
    /// The owning project, if any.
    pub project: Option<Project>,
    /// The project's manager, if any.
    pub manager: Option<User>,
}
