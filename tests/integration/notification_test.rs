//! Integration tests for event notifications.

use taskflow_core::traits::Repository;
use taskflow_entity::{CreateStory, Epic, Story};

use crate::helpers::{DAVE, PORTAL, QUIET, ROOT, TestApp, portal_story};

#[tokio::test]
async fn test_assignment_and_approval_notify() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;

    let story = app
        .story_service
        .create(
            &ctx,
            CreateStory {
                title: "Checkout flow".to_string(),
                project_id: Some(PORTAL),
                assignee_id: Some(DAVE),
                ..CreateStory::default()
            },
        )
        .await
        .unwrap();
    app.story_service
        .approve(&ctx, story.id.unwrap())
        .await
        .unwrap();

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "dave@example.com");
    assert_eq!(sent[0].subject, "New Task Assigned: Checkout flow");
    assert!(sent[0].body.contains("in project 'Portal'"));
    assert!(sent[0].body.contains("Due date: not set"));
    assert_eq!(sent[1].to, "maria@example.com");
    assert_eq!(sent[1].subject, "Task Completed: Checkout flow");
}

#[tokio::test]
async fn test_assignee_without_email_is_skipped() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;
    app.stories.seed([portal_story(20, "Docs", DAVE)]).await;

    let story = app.story_service.assign(&ctx, 20, QUIET).await.unwrap();
    assert_eq!(story.assignee_id, Some(QUIET));
    assert!(app.outbox.sent().await.is_empty());
}

#[tokio::test]
async fn test_transport_failure_does_not_fail_call() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;
    app.outbox.set_failing(true);

    let story = app
        .story_service
        .create(
            &ctx,
            CreateStory {
                title: "Offline".to_string(),
                project_id: Some(PORTAL),
                assignee_id: Some(DAVE),
                ..CreateStory::default()
            },
        )
        .await
        .unwrap();
    assert!(app.stories.find_by_id(story.id.unwrap()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_epic_approval_notifies_manager() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;
    app.epics
        .seed([Epic {
            id: Some(7),
            name: "Payments".to_string(),
            project_id: Some(PORTAL),
            ..Epic::default()
        }])
        .await;

    let epic = app.epic_service.approve(&ctx, 7).await.unwrap();
    assert!(epic.is_approved);
    assert!(epic.end_date.is_some());
    assert_eq!(app.outbox.subjects().await, vec!["Epic Approved: Payments"]);
}

#[tokio::test]
async fn test_completing_last_story_finishes_epic() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;
    app.epics
        .seed([Epic {
            id: Some(8),
            name: "Search".to_string(),
            project_id: Some(PORTAL),
            ..Epic::default()
        }])
        .await;
    app.stories
        .seed([
            Story {
                epic_id: Some(8),
                ..portal_story(30, "Index", DAVE)
            },
            Story {
                epic_id: Some(8),
                ..portal_story(31, "Query", DAVE)
            },
        ])
        .await;

    app.story_service.approve(&ctx, 30).await.unwrap();
    assert!(!app.epics.find_by_id(8).await.unwrap().unwrap().is_finished());

    app.story_service.approve(&ctx, 31).await.unwrap();
    app.story_service.approve(&ctx, 31).await.unwrap();

    let epic = app.epics.find_by_id(8).await.unwrap().unwrap();
    assert!(epic.is_approved && epic.is_finished());
    assert_eq!(
        app.outbox.subjects().await,
        vec![
            "Task Completed: Index",
            "Task Completed: Query",
            "Epic Finished: Search"
        ]
    );
}
