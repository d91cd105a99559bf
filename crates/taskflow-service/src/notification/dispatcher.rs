//! Formats notifications and hands them to the email service.

use tracing::debug;

use taskflow_core::traits::EmailMessage;
use taskflow_entity::graph::{EpicGraph, StoryGraph};
use taskflow_entity::sla_rule::SlaRule;

use super::compose;
use super::email::EmailService;

/// Sends one email per domain event. Every `notify_*` method returns
/// whether a send was attempted; a missing recipient is not an error.
#[derive(Clone)]
pub struct NotificationDispatcher {
    email: EmailService,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(email: EmailService) -> Self {
        Self { email }
    }

    async fn dispatch(&self, event: &'static str, message: Option<EmailMessage>) -> bool {
        match message {
            Some(message) => {
                self.email.send(message).await;
                true
            }
            None => {
                debug!(event, "No recipient address, notification skipped");
                false
            }
        }
    }

    /// A story was assigned.
    pub async fn notify_story_assigned(&self, graph: &StoryGraph) -> bool {
        self.dispatch("story_assigned", compose::story_assigned(graph))
            .await
    }

    /// A story was approved.
    pub async fn notify_story_completed(&self, graph: &StoryGraph) -> bool {
        self.dispatch("story_completed", compose::story_completed(graph))
            .await
    }

    /// An epic was approved.
    pub async fn notify_epic_approved(&self, graph: &EpicGraph) -> bool {
        self.dispatch("epic_approved", compose::epic_approved(graph))
            .await
    }

    /// An epic was finished.
    pub async fn notify_epic_finished(&self, graph: &EpicGraph) -> bool {
        self.dispatch("epic_finished", compose::epic_finished(graph))
            .await
    }

    /// A story is past its due date.
    pub async fn notify_overdue(&self, graph: &StoryGraph) -> bool {
        self.dispatch("overdue", compose::overdue(graph)).await
    }

    /// A story breached an SLA rule.
    pub async fn notify_sla_breach(&self, graph: &StoryGraph, rule: &SlaRule) -> bool {
        self.dispatch("sla_breach", compose::sla_breach(graph, rule))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingTransport, story, user};

    #[tokio::test]
    async fn test_no_address_means_no_attempt() {
        let transport = RecordingTransport::new();
        let dispatcher = NotificationDispatcher::new(EmailService::new(transport.clone()));
        let graph = StoryGraph {
            story: story(1, "Fix login", None, Some(2)),
            project: None,
            assignee: Some(user(2, "dave", None)),
            manager: None,
        };

        assert!(!dispatcher.notify_story_assigned(&graph).await);
        assert!(transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_still_counts_as_attempt() {
        let transport = RecordingTransport::new();
        transport.set_failing(true);
        let dispatcher = NotificationDispatcher::new(EmailService::new(transport.clone()));
        let graph = StoryGraph {
            story: story(1, "Fix login", None, Some(2)),
            project: None,
            assignee: Some(user(2, "dave", Some("dave@example.com"))),
            manager: None,
        };

        assert!(dispatcher.notify_overdue(&graph).await);
        assert!(transport.sent().await.is_empty());
    }
}
