//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskflow_auth::AccessControl;
use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::{EmailMessage, MailTransport};
use taskflow_database::{MemoryAuditStore, MemoryRepository};
use taskflow_entity::{Epic, Project, SlaRule, Story, User};
use taskflow_service::{
    AuditRecorder, AuditService, CallInterceptor, EmailService, EpicService, GraphResolver,
    NotificationDispatcher, RequestContext, StoryService, UserService,
};
use taskflow_worker::DeadlineSweep;

pub const ROOT: i64 = 1;
pub const DAVE: i64 = 2;
pub const MARIA: i64 = 3;
pub const QUIET: i64 = 4;
pub const PEER: i64 = 5;
pub const PORTAL: i64 = 10;

/// Mail transport that records every delivered message
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl Outbox {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn subjects(&self) -> Vec<String> {
        self.sent().await.into_iter().map(|m| m.subject).collect()
    }
}

#[async_trait]
impl MailTransport for Outbox {
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("Connection refused"));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    pub users: Arc<MemoryRepository<User>>,
    pub stories: Arc<MemoryRepository<Story>>,
    pub epics: Arc<MemoryRepository<Epic>>,
    pub rules: Arc<MemoryRepository<SlaRule>>,
    pub audit: Arc<MemoryAuditStore>,
    pub outbox: Arc<Outbox>,
    pub user_service: UserService,
    pub story_service: StoryService,
    pub epic_service: EpicService,
    pub audit_service: AuditService,
    pub sweep: DeadlineSweep,
}

impl TestApp {
    /// Create a new test application with the default directory seeded
    pub async fn new() -> Self {
        let users = Arc::new(MemoryRepository::<User>::new());
        let projects = Arc::new(MemoryRepository::<Project>::new());
        let stories = Arc::new(MemoryRepository::<Story>::new());
        let epics = Arc::new(MemoryRepository::<Epic>::new());
        let rules = Arc::new(MemoryRepository::<SlaRule>::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let outbox = Arc::new(Outbox::default());

        users
            .seed([
                member(ROOT, "root", "ADMIN", 5, Some("root@example.com")),
                member(DAVE, "dave", "EMPLOYEE", 2, Some("dave@example.com")),
                member(MARIA, "maria", "MANAGER", 4, Some("maria@example.com")),
                member(QUIET, "quiet", "EMPLOYEE", 2, None),
                member(PEER, "peer", "ADMIN", 5, Some("peer@example.com")),
            ])
            .await;
        projects
            .seed([Project {
                id: Some(PORTAL),
                name: "Portal".to_string(),
                manager_id: Some(MARIA),
                ..Project::default()
            }])
            .await;

        let recorder = AuditRecorder::new(audit.clone());
        let resolver = GraphResolver::new(users.clone(), projects.clone());
        let dispatcher = NotificationDispatcher::new(EmailService::new(outbox.clone()));
        let access = AccessControl::new();
        let calls = CallInterceptor::default();

        Self {
            user_service: UserService::new(users.clone(), recorder.clone(), access, calls),
            story_service: StoryService::new(
                stories.clone(),
                epics.clone(),
                users.clone(),
                recorder.clone(),
                resolver.clone(),
                dispatcher.clone(),
                calls,
            ),
            epic_service: EpicService::new(
                epics.clone(),
                recorder,
                resolver.clone(),
                dispatcher.clone(),
                calls,
            ),
            audit_service: AuditService::new(audit.clone(), access, calls),
            sweep: DeadlineSweep::new(stories.clone(), rules.clone(), resolver, dispatcher),
            users,
            stories,
            epics,
            rules,
            audit,
            outbox,
        }
    }

    /// Request context acting as the seeded user `id`
    pub async fn as_user(&self, id: i64) -> RequestContext {
        use taskflow_core::traits::Repository;

        let user = self
            .users
            .find_by_id(id)
            .await
            .expect("user lookup")
            .expect("seeded user");
        RequestContext::authenticated(user, Some("10.0.0.7".to_string()))
    }
}

fn member(id: i64, username: &str, role: &str, level: i32, email: Option<&str>) -> User {
    User {
        id: Some(id),
        username: username.to_string(),
        email: email.map(str::to_string),
        role: Some(role.to_string()),
        access_level: Some(level),
        ..User::default()
    }
}

/// A story in the Portal project
pub fn portal_story(id: i64, title: &str, assignee: i64) -> Story {
    Story {
        id: Some(id),
        title: title.to_string(),
        project_id: Some(PORTAL),
        assignee_id: Some(assignee),
        ..Story::default()
    }
}
