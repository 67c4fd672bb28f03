//! Notifier that writes reminders to the application log.

use super::{Notifier, NotifyError, Reminder};
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_reminder(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        for fixture in &reminder.fixtures {
            tracing::info!(
                user_id = %reminder.user_id,
                email = %reminder.email,
                fixture_id = %fixture.fixture_id,
                gameweek = fixture.gameweek,
                deadline = %fixture.deadline,
                "Reminder: predict {} vs {}",
                fixture.home_team,
                fixture.away_team
            );
        }
        Ok(())
    }
}
