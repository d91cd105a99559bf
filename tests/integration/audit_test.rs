//! Integration tests for the audit trail.

use taskflow_core::error::ErrorKind;
use taskflow_core::traits::Repository;
use taskflow_core::types::pagination::PageRequest;
use taskflow_entity::{AuditFilter, CreateStory, OperationType, Story, UpdateStory};
use taskflow_service::{AuditRecorder, AuditedRepository};

use crate::helpers::{DAVE, PORTAL, ROOT, TestApp, portal_story};

#[tokio::test]
async fn test_story_lifecycle_is_audited() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;

    let story = app
        .story_service
        .create(
            &ctx,
            CreateStory {
                title: "Login page".to_string(),
                project_id: Some(PORTAL),
                ..CreateStory::default()
            },
        )
        .await
        .unwrap();
    let id = story.id.unwrap();

    app.story_service
        .update(
            &ctx,
            id,
            UpdateStory {
                title: Some("Login and logout".to_string()),
                ..UpdateStory::default()
            },
        )
        .await
        .unwrap();
    app.story_service.delete(&ctx, id).await.unwrap();

    let history = app.audit_service.history(&ctx, "Story", id).await.unwrap();
    let ops: Vec<OperationType> = history.iter().map(|l| l.operation).collect();
    assert_eq!(
        ops,
        vec![OperationType::Delete, OperationType::Update, OperationType::Create]
    );

    let (delete, update, create) = (&history[0], &history[1], &history[2]);
    assert!(create.old_value.is_none() && create.new_value.is_some());
    assert!(update.old_value.is_some() && update.new_value.is_some());
    assert!(delete.old_value.is_some() && delete.new_value.is_none());

    assert_eq!(create.username, "root");
    assert_eq!(create.ip_address, "10.0.0.7");
    let changes = update.changes.as_ref().unwrap();
    assert_eq!(changes["title"], "Login page → Login and logout");
}

#[tokio::test]
async fn test_audit_failure_does_not_fail_write() {
    let app = TestApp::new().await;
    let ctx = app.as_user(ROOT).await;
    app.audit.set_failing(true);

    let story = app
        .story_service
        .create(
            &ctx,
            CreateStory {
                title: "Survives".to_string(),
                ..CreateStory::default()
            },
        )
        .await
        .unwrap();

    assert!(app.stories.find_by_id(story.id.unwrap()).await.unwrap().is_some());
    assert!(app.audit.entries().await.is_empty());
}

#[tokio::test]
async fn test_delete_by_id_uses_store_name() {
    let app = TestApp::new().await;
    app.stories.seed([portal_story(40, "Old", DAVE)]).await;

    let repo = AuditedRepository::<Story>::new(app.stories.clone(), AuditRecorder::new(app.audit.clone()));
    assert!(repo.delete_by_id(40).await.unwrap());

    let entries = app.audit.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity_type, "Story");
    assert_eq!(entries[0].entity_id, Some(40));
    assert_eq!(entries[0].operation, OperationType::Delete);
    assert_eq!(entries[0].username, "system");
}

#[tokio::test]
async fn test_search_and_statistics() {
    let app = TestApp::new().await;
    let admin = app.as_user(ROOT).await;
    let dave = app.as_user(DAVE).await;

    for title in ["One", "Two"] {
        app.story_service
            .create(
                &dave,
                CreateStory {
                    title: title.to_string(),
                    ..CreateStory::default()
                },
            )
            .await
            .unwrap();
    }

    let page = app
        .audit_service
        .search(
            &admin,
            AuditFilter {
                username: Some("DAV".to_string()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);

    let stats = app.audit_service.statistics(&admin).await.unwrap();
    assert_eq!(stats.total_logs, 2);
    assert_eq!(stats.by_entity_type.get("Story"), Some(&2));
}

#[tokio::test]
async fn test_audit_queries_require_admin() {
    let app = TestApp::new().await;
    let dave = app.as_user(DAVE).await;

    let err = app
        .audit_service
        .list(&dave, PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(err.message, "Administrator role required");
}
