//! Integration tests for profile edit permissions.

use taskflow_core::error::ErrorKind;
use taskflow_entity::{CreateUser, UpdateUser};

use crate::helpers::{DAVE, MARIA, PEER, QUIET, ROOT, TestApp};

fn job_title(title: &str) -> UpdateUser {
    UpdateUser {
        job_title: Some(title.to_string()),
        ..UpdateUser::default()
    }
}

#[tokio::test]
async fn test_user_can_edit_own_profile() {
    let app = TestApp::new().await;
    let dave = app.as_user(DAVE).await;

    let updated = app
        .user_service
        .update(&dave, DAVE, job_title("Engineer"))
        .await
        .unwrap();
    assert_eq!(updated.job_title.as_deref(), Some("Engineer"));
}

#[tokio::test]
async fn test_non_admin_cannot_edit_others() {
    let app = TestApp::new().await;
    let maria = app.as_user(MARIA).await;

    let err = app
        .user_service
        .update(&maria, QUIET, job_title("Intern"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(err.message.contains("Only administrators can edit"));
}

#[tokio::test]
async fn test_admin_needs_strictly_higher_level() {
    let app = TestApp::new().await;
    let root = app.as_user(ROOT).await;

    let err = app
        .user_service
        .update(&root, PEER, job_title("Director"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(err.message.contains("(Your level: 5, Their level: 5)"));

    let manager = app
        .user_service
        .update(&root, MARIA, job_title("Lead"))
        .await
        .unwrap();
    assert_eq!(manager.job_title.as_deref(), Some("Lead"));
}

#[tokio::test]
async fn test_self_edit_cannot_raise_role() {
    let app = TestApp::new().await;
    let dave = app.as_user(DAVE).await;

    let err = app
        .user_service
        .update(
            &dave,
            DAVE,
            UpdateUser {
                role: Some("ADMIN".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_cannot_delete_self() {
    let app = TestApp::new().await;
    let root = app.as_user(ROOT).await;

    let err = app.user_service.delete(&root, ROOT).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    app.user_service.delete(&root, DAVE).await.unwrap();
    let err = app.user_service.get(&root, DAVE).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_only_admin_creates_users() {
    let app = TestApp::new().await;
    let input = CreateUser {
        username: "newbie".to_string(),
        email: Some("newbie@example.com".to_string()),
        role: "manager".to_string(),
        access_level: None,
        job_title: None,
        department: None,
        reporting_to: Some(MARIA),
    };

    let dave = app.as_user(DAVE).await;
    let err = app
        .user_service
        .create(&dave, input.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let root = app.as_user(ROOT).await;
    let created = app.user_service.create(&root, input.clone()).await.unwrap();
    assert_eq!(created.role.as_deref(), Some("MANAGER"));
    assert_eq!(created.access_level, Some(4));

    let err = app.user_service.create(&root, input).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_admin_cannot_create_user_above_own_level() {
    let app = TestApp::new().await;
    let root = app.as_user(ROOT).await;
    let input = CreateUser {
        username: "overlord".to_string(),
        email: None,
        role: "admin".to_string(),
        access_level: Some(9),
        job_title: None,
        department: None,
        reporting_to: None,
    };

    let err = app
        .user_service
        .create(&root, input.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .user_service
        .create(
            &root,
            CreateUser {
                access_level: None,
                ..input
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}
