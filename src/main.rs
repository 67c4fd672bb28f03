use anyhow::Context;
use matchday::orchestration::schedule::{spawn_reconcile_loop, spawn_reminder_loop};
use matchday::orchestration::ReminderRunner;
use matchday::{api, config::Config, db::init_db, LogNotifier, Notifier, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let port = config.port;

    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("Failed to initialize database at {}", config.database_path))?;
    let repo = Arc::new(Repository::new(pool));

    let state = api::AppState::new(repo.clone(), config.clone());

    // Background jobs
    if let Some(period) = config.reconcile_interval() {
        spawn_reconcile_loop(state.reconciler.clone(), period);
        tracing::info!(period_secs = period.as_secs(), "Reconciliation loop started");
    }
    if let Some(period) = config.reminder_interval() {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        let runner = ReminderRunner::new(repo, notifier, &config);
        spawn_reminder_loop(runner, period);
        tracing::info!(period_secs = period.as_secs(), "Reminder loop started");
    }

    let app = api::create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
