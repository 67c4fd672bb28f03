use crate::config::Config;
use crate::db::Repository;
use crate::domain::{FixtureId, TimeMs};
use crate::notify::{Notifier, Reminder, ReminderFixture};
use std::sync::Arc;
use std::time::Duration;

/// Sends deadline reminders for fixtures users have not predicted yet.
#[derive(Clone)]
pub struct ReminderRunner {
    repo: Arc<Repository>,
    notifier: Arc<dyn Notifier>,
    window_ms: i64,
    send_delay: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub users_checked: usize,
    pub sent: usize,
    pub failed: usize,
}

impl ReminderRunner {
    pub fn new(repo: Arc<Repository>, notifier: Arc<dyn Notifier>, config: &Config) -> Self {
        Self {
            repo,
            notifier,
            window_ms: config.reminder_window_hours.saturating_mul(3_600_000),
            send_delay: Duration::from_millis(config.reminder_send_delay_ms),
        }
    }

    /// Check every user once, sequentially.
    ///
    /// A failed send is logged and leaves that user's fixtures unrecorded so
    /// the next run retries them.
    pub async fn run_once(&self, now: TimeMs) -> Result<ReminderReport, sqlx::Error> {
        let until = now.plus_ms(self.window_ms);
        let mut report = ReminderReport::default();

        for user in self.repo.list_users().await? {
            report.users_checked += 1;

            let pending = self.repo.query_pending_fixtures(user.id, now, until).await?;
            if pending.is_empty() {
                continue;
            }

            if report.sent + report.failed > 0 && !self.send_delay.is_zero() {
                tokio::time::sleep(self.send_delay).await;
            }

            let fixture_ids: Vec<FixtureId> = pending.iter().map(|p| p.fixture_id).collect();
            let reminder = Reminder {
                user_id: user.id,
                username: user.username,
                email: user.email,
                fixtures: pending
                    .into_iter()
                    .map(|p| ReminderFixture {
                        fixture_id: p.fixture_id,
                        home_team: p.home_team,
                        away_team: p.away_team,
                        gameweek: p.gameweek,
                        deadline: p.deadline,
                    })
                    .collect(),
            };

            match self.notifier.send_reminder(&reminder).await {
                Ok(()) => {
                    self.repo
                        .record_reminders(user.id, &fixture_ids, now)
                        .await?;
                    report.sent += 1;
                }
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Failed to send reminder");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            users = report.users_checked,
            sent = report.sent,
            failed = report.failed,
            "Reminder check complete"
        );
        Ok(report)
    }
}
