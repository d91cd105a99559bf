//! Interval scheduler for the deadline sweep.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use taskflow_core::AppError;
use taskflow_core::config::SweepConfig;
use taskflow_core::result::AppResult;

use crate::jobs::{DeadlineSweep, SweepReport};

/// Runs [`DeadlineSweep`] on a fixed interval. A tick that fires while the
/// previous one is still running is skipped.
pub struct SweepScheduler {
    scheduler: JobScheduler,
    sweep: Arc<DeadlineSweep>,
    running: Arc<AtomicBool>,
    interval: Duration,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler")
            .field("interval", &self.interval)
            .finish()
    }
}

impl SweepScheduler {
    /// Create a new scheduler
    pub async fn new(sweep: Arc<DeadlineSweep>, config: &SweepConfig) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            sweep,
            running: Arc::new(AtomicBool::new(false)),
            interval: Duration::from_secs(config.interval_seconds.max(1)),
        })
    }

    /// Register the sweep job
    pub async fn register(&self) -> AppResult<()> {
        let sweep = Arc::clone(&self.sweep);
        let running = Arc::clone(&self.running);
        let job = CronJob::new_repeated_async(self.interval, move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            let running = Arc::clone(&running);
            Box::pin(async move {
                run_guarded(&sweep, &running).await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep schedule: {e}")))?;

        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            "Registered: deadline_sweep"
        );
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Sweep scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Sweep scheduler shut down");
        Ok(())
    }
}

/// Run one tick unless another is in flight. Returns `None` when the tick
/// was skipped or failed.
pub(crate) async fn run_guarded(
    sweep: &DeadlineSweep,
    running: &AtomicBool,
) -> Option<SweepReport> {
    if running
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        tracing::warn!("Previous sweep still running, tick skipped");
        return None;
    }

    let result = sweep.run_tick(Utc::now()).await;
    running.store(false, Ordering::Release);

    match result {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(error = %e, error_code = e.code(), "Sweep tick failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use taskflow_core::traits::{EmailMessage, MailTransport};
    use taskflow_database::MemoryRepository;
    use taskflow_entity::project::Project;
    use taskflow_entity::sla_rule::SlaRule;
    use taskflow_entity::story::Story;
    use taskflow_entity::user::User;
    use taskflow_service::{EmailService, GraphResolver, NotificationDispatcher};

    struct Discard;

    #[async_trait]
    impl MailTransport for Discard {
        async fn deliver(&self, _message: &EmailMessage) -> AppResult<()> {
            Ok(())
        }
    }

    fn sweep(stories: Arc<MemoryRepository<Story>>) -> DeadlineSweep {
        DeadlineSweep::new(
            stories,
            Arc::new(MemoryRepository::<SlaRule>::new()),
            GraphResolver::new(
                Arc::new(MemoryRepository::<User>::new()),
                Arc::new(MemoryRepository::<Project>::new()),
            ),
            NotificationDispatcher::new(EmailService::new(Arc::new(Discard))),
        )
    }

    #[tokio::test]
    async fn test_tick_is_skipped_while_running() {
        let sweep = sweep(Arc::new(MemoryRepository::new()));
        let running = AtomicBool::new(true);
        assert!(run_guarded(&sweep, &running).await.is_none());
        assert!(running.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_guard_is_released_after_failure() {
        let stories = Arc::new(MemoryRepository::new());
        stories.set_failing(true);
        let sweep = sweep(stories.clone());
        let running = AtomicBool::new(false);

        assert!(run_guarded(&sweep, &running).await.is_none());
        assert!(!running.load(Ordering::SeqCst));

        stories.set_failing(false);
        let report = run_guarded(&sweep, &running).await.unwrap();
        assert_eq!(report.tasks_scanned, 0);
    }
}
