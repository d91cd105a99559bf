//! Story creation, assignment, approval and removal.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use validator::Validate;

use taskflow_auth::Principal;
use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::epic::Epic;
use taskflow_entity::story::{CreateStory, Story, UpdateStory};
use taskflow_entity::user::User;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::intercept::{AuditedRepository, CallInterceptor};
use crate::notification::{GraphResolver, NotificationDispatcher};

/// Manages stories and announces assignment and approval. Approving the
/// last open story of an epic completes the epic.
#[derive(Clone)]
pub struct StoryService {
    stories: AuditedRepository<Story>,
    epics: AuditedRepository<Epic>,
    users: Arc<dyn Repository<User>>,
    resolver: GraphResolver,
    dispatcher: NotificationDispatcher,
    calls: CallInterceptor,
}

impl StoryService {
    /// Creates a new story service.
    pub fn new(
        stories: Arc<dyn Repository<Story>>,
        epics: Arc<dyn Repository<Epic>>,
        users: Arc<dyn Repository<User>>,
        recorder: AuditRecorder,
        resolver: GraphResolver,
        dispatcher: NotificationDispatcher,
        calls: CallInterceptor,
    ) -> Self {
        Self {
            stories: AuditedRepository::new(stories, recorder.clone()),
            epics: AuditedRepository::new(epics, recorder),
            users,
            resolver,
            dispatcher,
            calls,
        }
    }

    async fn load(&self, id: i64) -> AppResult<Story> {
        self.stories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Story {id} not found")))
    }

    async fn announce_assignment(&self, story: &Story) {
        match self.resolver.resolve_story(story).await {
            Ok(graph) => {
                self.dispatcher.notify_story_assigned(&graph).await;
            }
            Err(e) => warn!(story_id = story.id, error = %e, "Cannot resolve story for notification"),
        }
    }

    /// Approve and finish the story's epic once every story in it has an
    /// end date. Failures are logged; the story approval stands.
    async fn complete_epic_if_done(&self, ctx: &RequestContext, story: &Story) {
        let Some(epic_id) = story.epic_id else {
            return;
        };
        match self.try_complete_epic(ctx, epic_id).await {
            Ok(Some(epic)) => match self.resolver.resolve_epic(&epic).await {
                Ok(graph) => {
                    self.dispatcher.notify_epic_finished(&graph).await;
                }
                Err(e) => warn!(epic_id, error = %e, "Cannot resolve epic for notification"),
            },
            Ok(None) => {}
            Err(e) => warn!(epic_id, error = %e, "Epic completion check failed"),
        }
    }

    async fn try_complete_epic(&self, ctx: &RequestContext, epic_id: i64) -> AppResult<Option<Epic>> {
        let open = self
            .stories
            .find_all()
            .await?
            .iter()
            .filter(|s| s.epic_id == Some(epic_id))
            .any(|s| s.end_date.is_none());
        if open {
            return Ok(None);
        }

        let Some(mut epic) = self.epics.find_by_id(epic_id).await? else {
            debug!(epic_id, "Epic not found, completion skipped");
            return Ok(None);
        };
        if epic.is_finished() {
            return Ok(None);
        }

        epic.approve(Utc::now().date_naive());
        let saved = self.epics.for_actor(ctx).save(&epic).await?;
        info!(epic_id, "All stories done, epic finished");
        Ok(Some(saved))
    }

    /// Gets a story by id.
    pub async fn get(&self, ctx: &RequestContext, id: i64) -> AppResult<Story> {
        self.calls
            .around(ctx, "StoryService.get", self.load(id))
            .await
    }

    /// Lists every story.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Story>> {
        self.calls
            .around(ctx, "StoryService.list", self.stories.find_all())
            .await
    }

    /// Creates a story and notifies its assignee.
    pub async fn create(&self, ctx: &RequestContext, input: CreateStory) -> AppResult<Story> {
        self.calls
            .around(ctx, "StoryService.create", async {
                let creator = ctx.current_user()?;
                input.validate()?;

                let story = input.into_story(creator.id, Utc::now());
                let saved = self.stories.for_actor(ctx).save(&story).await?;
                info!(story_id = saved.id, title = %saved.title, "Story created");

                if saved.assignee_id.is_some() {
                    self.announce_assignment(&saved).await;
                }
                Ok(saved)
            })
            .await
    }

    /// Applies a partial update.
    pub async fn update(&self, ctx: &RequestContext, id: i64, input: UpdateStory) -> AppResult<Story> {
        self.calls
            .around(ctx, "StoryService.update", async {
                ctx.current_user()?;
                input.validate()?;

                let mut story = self.load(id).await?;
                input.apply(&mut story);
                self.stories.for_actor(ctx).save(&story).await
            })
            .await
    }

    /// Assigns the story to a user and notifies them.
    pub async fn assign(&self, ctx: &RequestContext, id: i64, assignee_id: i64) -> AppResult<Story> {
        self.calls
            .around(ctx, "StoryService.assign", async {
                ctx.current_user()?;
                if self.users.find_by_id(assignee_id).await?.is_none() {
                    return Err(AppError::not_found(format!("User {assignee_id} not found")));
                }

                let mut story = self.load(id).await?;
                story.assignee_id = Some(assignee_id);
                let saved = self.stories.for_actor(ctx).save(&story).await?;
                info!(story_id = id, assignee_id, "Story assigned");

                self.announce_assignment(&saved).await;
                Ok(saved)
            })
            .await
    }

    /// Approves the story, stamping today as end date if unset, and
    /// notifies the project manager. Approving a completed story is a no-op.
    pub async fn approve(&self, ctx: &RequestContext, id: i64) -> AppResult<Story> {
        self.calls
            .around(ctx, "StoryService.approve", async {
                ctx.current_user()?;
                let mut story = self.load(id).await?;
                if story.is_approved && story.end_date.is_some() {
                    debug!(story_id = id, "Story already completed");
                    return Ok(story);
                }
                story.is_approved = true;
                if story.end_date.is_none() {
                    story.end_date = Some(Utc::now().date_naive());
                }
                let saved = self.stories.for_actor(ctx).save(&story).await?;
                info!(story_id = id, "Story approved");

                match self.resolver.resolve_story(&saved).await {
                    Ok(graph) => {
                        self.dispatcher.notify_story_completed(&graph).await;
                    }
                    Err(e) => warn!(story_id = id, error = %e, "Cannot resolve story for notification"),
                }
                self.complete_epic_if_done(ctx, &saved).await;
                Ok(saved)
            })
            .await
    }

    /// Deletes a story.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        self.calls
            .around(ctx, "StoryService.delete", async {
                ctx.current_user()?;
                let story = self.load(id).await?;
                self.stories.for_actor(ctx).delete(&story).await?;
                info!(story_id = id, "Story deleted");
                Ok(())
            })
            .await
    }
}
