//! Taskflow Server: workflow task tracking backend
//!
//! Main entry point that wires all crates together and runs the deadline
//! sweep until shutdown.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use taskflow_auth::AccessControl;
use taskflow_core::AppError;
use taskflow_core::config::AppConfig;
use taskflow_core::traits::Repository;
use taskflow_database::repositories::{
    AuditLogRepository, EpicRepository, ProjectRepository, SlaRuleRepository, StoryRepository,
    UserRepository,
};
use taskflow_database::{AuditStore, DatabasePool};
use taskflow_entity::{Epic, Project, SlaRule, Story, User};
use taskflow_service::{
    AuditRecorder, AuditService, CallInterceptor, EmailService, EpicService, GraphResolver,
    NotificationDispatcher, StoryService, UserService,
};
use taskflow_worker::{DeadlineSweep, SweepScheduler};

/// Services shared by every entry point into the application. Held until
/// shutdown.
#[allow(dead_code)]
struct AppState {
    users: UserService,
    stories: StoryService,
    epics: EpicService,
    audit: AuditService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(["UserService", "StoryService", "EpicService", "AuditService"])
            .finish()
    }
}

#[tokio::main]
async fn main() {
    let env = std::env::var("TASKFLOW_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, error_code = e.code(), "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Taskflow v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        taskflow_database::migration::run_migrations(db.pool()).await?;
    }

    // ── Step 2: Initialize repositories ──────────────────────────
    let pool = db.pool().clone();
    let users: Arc<dyn Repository<User>> = Arc::new(UserRepository::new(pool.clone()));
    let projects: Arc<dyn Repository<Project>> = Arc::new(ProjectRepository::new(pool.clone()));
    let epics: Arc<dyn Repository<Epic>> = Arc::new(EpicRepository::new(pool.clone()));
    let stories: Arc<dyn Repository<Story>> = Arc::new(StoryRepository::new(pool.clone()));
    let rules: Arc<dyn Repository<SlaRule>> = Arc::new(SlaRuleRepository::new(pool.clone()));
    let audit_store: Arc<dyn AuditStore> = Arc::new(AuditLogRepository::new(pool));

    // ── Step 3: Mail transport ───────────────────────────────────
    let transport = taskflow_mail::transport_from_config(&config.mail)?;
    let dispatcher = NotificationDispatcher::new(EmailService::new(transport));
    tracing::info!(smtp = config.mail.enabled, "Mail transport initialized");

    // ── Step 4: Initialize services ──────────────────────────────
    let recorder = AuditRecorder::new(Arc::clone(&audit_store));
    let resolver = GraphResolver::new(Arc::clone(&users), Arc::clone(&projects));
    let access = AccessControl::new();
    let calls = CallInterceptor::new(&config.monitoring);

    let state = AppState {
        users: UserService::new(Arc::clone(&users), recorder.clone(), access, calls),
        stories: StoryService::new(
            Arc::clone(&stories),
            Arc::clone(&epics),
            Arc::clone(&users),
            recorder.clone(),
            resolver.clone(),
            dispatcher.clone(),
            calls,
        ),
        epics: EpicService::new(epics, recorder, resolver.clone(), dispatcher.clone(), calls),
        audit: AuditService::new(audit_store, access, calls),
    };
    tracing::info!(services = ?state, "Services initialized");

    // ── Step 5: Start deadline sweep ─────────────────────────────
    let mut scheduler = if config.sweep.enabled {
        let sweep = Arc::new(DeadlineSweep::new(stories, rules, resolver, dispatcher));
        let scheduler = SweepScheduler::new(sweep, &config.sweep).await?;
        scheduler.register().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Deadline sweep disabled");
        None
    };

    // ── Step 6: Wait for shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
        }
    }
    drop(state);
    db.close().await;

    tracing::info!("Taskflow stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
