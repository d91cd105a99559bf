//! Integration tests for the deadline sweep.

use chrono::{Duration, Utc};

use taskflow_entity::{SlaRule, Story};

use crate::helpers::{DAVE, QUIET, TestApp, portal_story};

#[tokio::test]
async fn test_overdue_is_announced_once_per_tick() {
    let app = TestApp::new().await;
    let now = Utc::now();
    let yesterday = (now - Duration::days(1)).date_naive();
    app.stories
        .seed([
            Story {
                due_date: Some(yesterday),
                ..portal_story(1, "Late", DAVE)
            },
            Story {
                due_date: Some(yesterday),
                is_approved: true,
                ..portal_story(2, "Done", DAVE)
            },
        ])
        .await;

    let first = app.sweep.run_tick(now).await.unwrap();
    assert_eq!(first.overdue_sent, 1);
    let second = app.sweep.run_tick(now).await.unwrap();
    assert_eq!(second.overdue_sent, 1);

    assert_eq!(
        app.outbox.subjects().await,
        vec!["Overdue Task: Late", "Overdue Task: Late"]
    );
}

#[tokio::test]
async fn test_sla_breach_goes_to_project_manager() {
    let app = TestApp::new().await;
    let now = Utc::now();
    app.stories
        .seed([
            Story {
                epic_id: Some(3),
                created_at: Some(now - Duration::hours(25)),
                ..portal_story(1, "Stuck", DAVE)
            },
            Story {
                epic_id: Some(3),
                created_at: Some(now - Duration::hours(23)),
                ..portal_story(2, "Fresh", DAVE)
            },
        ])
        .await;
    app.rules
        .seed([SlaRule {
            id: Some(12),
            state_id: Some(3),
            duration_hours: 24,
            notify_email: true,
            ..SlaRule::default()
        }])
        .await;

    let report = app.sweep.run_tick(now).await.unwrap();
    assert_eq!(report.sla_breaches_sent, 1);

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "maria@example.com");
    assert_eq!(sent[0].subject, "SLA Breach: Stuck");
    assert_eq!(sent[0].body, "SLA breached for task 'Stuck' (rule: SLA#12).");
}

#[tokio::test]
async fn test_overdue_without_address_sends_nothing() {
    let app = TestApp::new().await;
    let now = Utc::now();
    app.stories
        .seed([Story {
            due_date: Some((now - Duration::days(3)).date_naive()),
            ..portal_story(1, "Silent", QUIET)
        }])
        .await;

    let report = app.sweep.run_tick(now).await.unwrap();
    assert_eq!(report.overdue_sent, 0);
    assert_eq!(report.skipped, 0);
    assert!(app.outbox.sent().await.is_empty());
}

#[tokio::test]
async fn test_rule_load_failure_aborts_tick() {
    let app = TestApp::new().await;
    app.rules.set_failing(true);
    assert!(app.sweep.run_tick(Utc::now()).await.is_err());
}
