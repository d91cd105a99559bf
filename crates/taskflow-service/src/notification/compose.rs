//! Pure message formatting for each notification event.
//!
//! Every function returns `None` when the event has no usable recipient.

use taskflow_core::traits::EmailMessage;
use taskflow_entity::graph::{EpicGraph, StoryGraph};
use taskflow_entity::sla_rule::SlaRule;
use taskflow_entity::user::User;

fn address(user: Option<&User>) -> Option<&str> {
    user.and_then(User::usable_email)
}

/// Tell the assignee about a new task.
pub fn story_assigned(graph: &StoryGraph) -> Option<EmailMessage> {
    let assignee = graph.assignee.as_ref()?;
    let to = assignee.usable_email()?;
    let story = &graph.story;
    let due = story
        .due_date
        .map_or_else(|| "not set".to_string(), |d| d.to_string());
    let body = format!(
        "Hello {},\n\nYou have been assigned a new task: '{}' in project '{}'.\nDue date: {}\n\nDescription:\n{}",
        assignee.username,
        story.title,
        graph.project_name(),
        due,
        story.description.as_deref().unwrap_or("")
    );
    Some(EmailMessage::new(
        to,
        format!("New Task Assigned: {}", story.title),
        body,
    ))
}

/// Tell the story's manager that it was approved.
pub fn story_completed(graph: &StoryGraph) -> Option<EmailMessage> {
    let manager = graph.manager.as_ref()?;
    let to = manager.usable_email()?;
    let title = &graph.story.title;
    Some(EmailMessage::new(
        to,
        format!("Task Completed: {title}"),
        format!(
            "Hello {},\n\nThe task '{title}' has been marked completed/approved.\n\nRegards",
            manager.username
        ),
    ))
}

/// Tell the project manager that an epic was approved.
pub fn epic_approved(graph: &EpicGraph) -> Option<EmailMessage> {
    graph.project.as_ref()?;
    let to = address(graph.manager.as_ref())?;
    let name = &graph.epic.name;
    Some(EmailMessage::new(
        to,
        format!("Epic Approved: {name}"),
        format!("Epic '{name}' has been approved."),
    ))
}

/// Tell the project manager that an epic was finished.
pub fn epic_finished(graph: &EpicGraph) -> Option<EmailMessage> {
    graph.project.as_ref()?;
    let to = address(graph.manager.as_ref())?;
    let name = &graph.epic.name;
    Some(EmailMessage::new(
        to,
        format!("Epic Finished: {name}"),
        format!("Epic '{name}' has been finished."),
    ))
}

/// Remind the assignee of an overdue task.
pub fn overdue(graph: &StoryGraph) -> Option<EmailMessage> {
    let to = address(graph.assignee.as_ref())?;
    let title = &graph.story.title;
    Some(EmailMessage::new(
        to,
        format!("Overdue Task: {title}"),
        format!("Your task '{title}' is overdue. Please take action."),
    ))
}

/// Escalate an SLA breach to the project manager, else the assignee.
pub fn sla_breach(graph: &StoryGraph, rule: &SlaRule) -> Option<EmailMessage> {
    let to = address(graph.manager.as_ref()).or_else(|| address(graph.assignee.as_ref()))?;
    let title = &graph.story.title;
    Some(EmailMessage::new(
        to,
        format!("SLA Breach: {title}"),
        format!(
            "SLA breached for task '{title}' (rule: {}).",
            rule.display_name()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{project, story, user};
    use chrono::NaiveDate;
    use taskflow_entity::epic::Epic;

    fn graph(assignee_email: Option<&str>, manager_email: Option<&str>) -> StoryGraph {
        let mut s = story(1, "Fix login", Some(10), Some(2));
        s.due_date = NaiveDate::from_ymd_opt(2024, 6, 30);
        s.description = Some("Patch the OAuth flow".to_string());
        StoryGraph {
            story: s,
            project: Some(project(10, "Portal", Some(3))),
            assignee: Some(user(2, "dave", assignee_email)),
            manager: Some(user(3, "maria", manager_email)),
        }
    }

    #[test]
    fn test_assigned_body() {
        let msg = story_assigned(&graph(Some("dave@example.com"), None)).unwrap();
        assert_eq!(msg.to, "dave@example.com");
        assert_eq!(msg.subject, "New Task Assigned: Fix login");
        assert_eq!(
            msg.body,
            "Hello dave,\n\nYou have been assigned a new task: 'Fix login' in project 'Portal'.\n\
             Due date: 2024-06-30\n\nDescription:\nPatch the OAuth flow"
        );
    }

    #[test]
    fn test_missing_or_blank_address_skips() {
        assert!(story_assigned(&graph(None, None)).is_none());
        assert!(overdue(&graph(Some("  "), None)).is_none());
        assert!(story_completed(&graph(None, None)).is_none());
    }

    #[test]
    fn test_completed_goes_to_manager() {
        let msg = story_completed(&graph(None, Some("maria@example.com"))).unwrap();
        assert_eq!(msg.to, "maria@example.com");
        assert_eq!(msg.subject, "Task Completed: Fix login");
        assert!(msg.body.starts_with("Hello maria,"));
    }

    #[test]
    fn test_sla_breach_falls_back_to_assignee() {
        let rule = SlaRule {
            id: Some(4),
            ..SlaRule::default()
        };
        let msg = sla_breach(&graph(Some("dave@example.com"), None), &rule).unwrap();
        assert_eq!(msg.to, "dave@example.com");
        assert_eq!(
            msg.body,
            "SLA breached for task 'Fix login' (rule: SLA#4)."
        );

        let msg = sla_breach(&graph(Some("dave@example.com"), Some("maria@example.com")), &rule).unwrap();
        assert_eq!(msg.to, "maria@example.com");
    }

    #[test]
    fn test_epic_messages_need_project() {
        let epic = Epic {
            id: Some(5),
            name: "Checkout".to_string(),
            ..Epic::default()
        };
        let mut g = EpicGraph {
            epic,
            project: None,
            manager: Some(user(3, "maria", Some("maria@example.com"))),
        };
        assert!(epic_approved(&g).is_none());

        g.project = Some(project(10, "Portal", Some(3)));
        let msg = epic_finished(&g).unwrap();
        assert_eq!(msg.subject, "Epic Finished: Checkout");
        assert_eq!(msg.body, "Epic 'Checkout' has been finished.");
    }
}
