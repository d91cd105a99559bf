//! Overdue and SLA-breach sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_entity::sla_rule::SlaRule;
use taskflow_entity::story::Story;
use taskflow_service::{Directory, GraphResolver, NotificationDispatcher};

/// Outcome of one sweep tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Stories loaded for this tick.
    pub tasks_scanned: usize,
    /// Active SLA rules that were evaluated.
    pub rules_evaluated: usize,
    /// Overdue notifications attempted.
    pub overdue_sent: usize,
    /// SLA-breach notifications attempted.
    pub sla_breaches_sent: usize,
    /// Stories skipped because their graph could not be resolved.
    pub skipped: usize,
}

/// Scans every story once per tick.
#[derive(Clone)]
pub struct DeadlineSweep {
    stories: Arc<dyn Repository<Story>>,
    rules: Arc<dyn Repository<SlaRule>>,
    resolver: GraphResolver,
    dispatcher: NotificationDispatcher,
}

impl std::fmt::Debug for DeadlineSweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlineSweep").finish()
    }
}

impl DeadlineSweep {
    /// Create a new sweep
    pub fn new(
        stories: Arc<dyn Repository<Story>>,
        rules: Arc<dyn Repository<SlaRule>>,
        resolver: GraphResolver,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            stories,
            rules,
            resolver,
            dispatcher,
        }
    }

    /// Run one tick at `now`. Any load failure aborts the tick.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let stories = self.stories.find_all().await?;
        let directory = self.resolver.snapshot().await?;
        let mut report = SweepReport {
            tasks_scanned: stories.len(),
            ..SweepReport::default()
        };

        self.check_overdue(&stories, &directory, now, &mut report)
            .await;

        let rules = self.rules.find_all().await?;
        for rule in rules.iter().filter(|r| r.is_active()) {
            report.rules_evaluated += 1;
            self.check_rule(rule, &stories, &directory, now, &mut report)
                .await;
        }

        info!(
            tasks = report.tasks_scanned,
            rules = report.rules_evaluated,
            overdue = report.overdue_sent,
            breaches = report.sla_breaches_sent,
            skipped = report.skipped,
            "Sweep tick completed"
        );
        Ok(report)
    }

    async fn check_overdue(
        &self,
        stories: &[Story],
        directory: &Directory,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) {
        let today = now.date_naive();
        for story in stories.iter().filter(|s| s.is_overdue(today)) {
            match directory.story_graph(story) {
                Ok(graph) => {
                    if self.dispatcher.notify_overdue(&graph).await {
                        report.overdue_sent += 1;
                    }
                }
                Err(e) => {
                    warn!(story_id = story.id, error = %e, "Skipping overdue check");
                    report.skipped += 1;
                }
            }
        }
    }

    async fn check_rule(
        &self,
        rule: &SlaRule,
        stories: &[Story],
        directory: &Directory,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) {
        let in_state = stories
            .iter()
            .filter(|s| s.epic_id.is_some() && s.epic_id == rule.state_id);

        for story in in_state {
            let Some(elapsed) = story.hours_since_creation(now) else {
                debug!(story_id = story.id, "No creation time, SLA not evaluated");
                continue;
            };
            if !rule.is_breached_after(elapsed) {
                continue;
            }
            match directory.story_graph(story) {
                Ok(graph) => {
                    if self.dispatcher.notify_sla_breach(&graph, rule).await {
                        report.sla_breaches_sent += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        story_id = story.id,
                        rule = %rule.display_name(),
                        error = %e,
                        "Skipping SLA check"
                    );
                    report.skipped += 1;
                }
            }
        }
    }
}
