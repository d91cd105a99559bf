//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::{EmailMessage, MailTransport};
use taskflow_entity::project::Project;
use taskflow_entity::story::Story;
use taskflow_entity::user::User;

/// Mail transport that keeps every delivered message.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("SMTP server unreachable"));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

pub fn user(id: i64, username: &str, email: Option<&str>) -> User {
    User {
        id: Some(id),
        username: username.to_string(),
        email: email.map(str::to_string),
        role: Some("EMPLOYEE".to_string()),
        access_level: Some(2),
        ..User::default()
    }
}

pub fn admin(id: i64, username: &str) -> User {
    User {
        role: Some("ADMIN".to_string()),
        access_level: Some(5),
        ..user(id, username, Some(&format!("{username}@example.com")))
    }
}

pub fn project(id: i64, name: &str, manager_id: Option<i64>) -> Project {
    Project {
        id: Some(id),
        name: name.to_string(),
        manager_id,
        ..Project::default()
    }
}

pub fn story(id: i64, title: &str, project_id: Option<i64>, assignee_id: Option<i64>) -> Story {
    Story {
        id: Some(id),
        title: title.to_string(),
        project_id,
        assignee_id,
        ..Story::default()
    }
}
