//! Resolution of the users and projects a notification refers to.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use taskflow_core::AppError;
use taskflow_core::error::ErrorKind;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::epic::Epic;
use taskflow_entity::graph::{EpicGraph, StoryGraph};
use taskflow_entity::project::Project;
use taskflow_entity::story::Story;
use taskflow_entity::user::User;

/// A snapshot of all users and projects, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: HashMap<i64, User>,
    projects: HashMap<i64, Project>,
}

impl Directory {
    /// Build a directory from loaded records. Records without an id are
    /// ignored.
    pub fn new(users: Vec<User>, projects: Vec<Project>) -> Self {
        Self {
            users: users
                .into_iter()
                .filter_map(|u| u.id.map(|id| (id, u)))
                .collect(),
            projects: projects
                .into_iter()
                .filter_map(|p| p.id.map(|id| (id, p)))
                .collect(),
        }
    }

    fn user(&self, id: Option<i64>, role: &str) -> AppResult<Option<User>> {
        match id {
            None => Ok(None),
            Some(id) => self
                .users
                .get(&id)
                .cloned()
                .map(Some)
                .ok_or_else(|| AppError::not_found(format!("{role} {id} not found"))),
        }
    }

    fn project(&self, id: Option<i64>) -> AppResult<Option<Project>> {
        match id {
            None => Ok(None),
            Some(id) => self
                .projects
                .get(&id)
                .cloned()
                .map(Some)
                .ok_or_else(|| AppError::not_found(format!("Project {id} not found"))),
        }
    }

    /// Attach project, assignee and project manager to a story.
    ///
    /// Absent references stay `None`. A missing project or assignee is an
    /// error; a missing manager is logged and left `None`.
    pub fn story_graph(&self, story: &Story) -> AppResult<StoryGraph> {
        let project = self.project(story.project_id)?;
        let assignee = self.user(story.assignee_id, "Assignee")?;
        let manager = lenient_manager(
            story,
            self.user(project.as_ref().and_then(|p| p.manager_id), "Manager"),
        )?;
        Ok(StoryGraph {
            story: story.clone(),
            project,
            assignee,
            manager,
        })
    }

    /// Attach project and project manager to an epic.
    pub fn epic_graph(&self, epic: &Epic) -> AppResult<EpicGraph> {
        let project = self.project(epic.project_id)?;
        let manager = self.user(project.as_ref().and_then(|p| p.manager_id), "Manager")?;
        Ok(EpicGraph {
            epic: epic.clone(),
            project,
            manager,
        })
    }
}

/// Loads directory snapshots and resolves single graphs on demand.
#[derive(Clone)]
pub struct GraphResolver {
    users: Arc<dyn Repository<User>>,
    projects: Arc<dyn Repository<Project>>,
}

impl GraphResolver {
    /// Creates a new resolver.
    pub fn new(users: Arc<dyn Repository<User>>, projects: Arc<dyn Repository<Project>>) -> Self {
        Self { users, projects }
    }

    /// Load every user and project once.
    pub async fn snapshot(&self) -> AppResult<Directory> {
        let users = self.users.find_all().await?;
        let projects = self.projects.find_all().await?;
        Ok(Directory::new(users, projects))
    }

    /// Resolve one story graph with point lookups.
    pub async fn resolve_story(&self, story: &Story) -> AppResult<StoryGraph> {
        let project = self.load_project(story.project_id).await?;
        let assignee = self.load_user(story.assignee_id, "Assignee").await?;
        let manager = lenient_manager(
            story,
            self.load_user(project.as_ref().and_then(|p| p.manager_id), "Manager")
                .await,
        )?;
        Ok(StoryGraph {
            story: story.clone(),
            project,
            assignee,
            manager,
        })
    }

    /// Resolve one epic graph with point lookups.
    pub async fn resolve_epic(&self, epic: &Epic) -> AppResult<EpicGraph> {
        let project = self.load_project(epic.project_id).await?;
        let manager = self
            .load_user(project.as_ref().and_then(|p| p.manager_id), "Manager")
            .await?;
        Ok(EpicGraph {
            epic: epic.clone(),
            project,
            manager,
        })
    }

    async fn load_project(&self, id: Option<i64>) -> AppResult<Option<Project>> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.projects
            .find_by_id(id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    async fn load_user(&self, id: Option<i64>, role: &str) -> AppResult<Option<User>> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.users
            .find_by_id(id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::not_found(format!("{role} {id} not found")))
    }
}

/// Only a dangling manager reference is tolerated; store errors still fail.
fn lenient_manager(story: &Story, manager: AppResult<Option<User>>) -> AppResult<Option<User>> {
    match manager {
        Err(e) if e.kind == ErrorKind::NotFound => {
            warn!(story_id = story.id, error = %e, "Project manager missing, ignored");
            Ok(None)
        }
        other => other,
    }
}
