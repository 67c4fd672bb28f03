use crate::domain::TimeMs;
use crate::orchestration::reconcile::Reconciler;
use crate::orchestration::reminders::ReminderRunner;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run status reconciliation every `period` until the task is aborted.
pub fn spawn_reconcile_loop(reconciler: Reconciler, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(e) = reconciler.reconcile().await {
                tracing::error!(error = %e, "Scheduled reconciliation failed");
            }
        }
    })
}

/// Run the reminder check every `period` until the task is aborted.
pub fn spawn_reminder_loop(runner: ReminderRunner, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = runner.run_once(TimeMs::now()).await {
                tracing::error!(error = %e, "Scheduled reminder check failed");
            }
        }
    })
}
