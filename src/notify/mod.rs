//! Delivery boundary for deadline reminders.

use crate::domain::{FixtureId, TimeMs, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod log;
pub mod mock;

pub use log::LogNotifier;
pub use mock::MockNotifier;

/// A fixture listed in a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFixture {
    pub fixture_id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub gameweek: i64,
    pub deadline: TimeMs,
}

/// One reminder to one user covering every fixture they still need to predict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub fixtures: Vec<ReminderFixture>,
}

/// Sends reminders to users.
///
/// Implementations own the transport; callers throttle and handle failures.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    async fn send_reminder(&self, reminder: &Reminder) -> Result<(), NotifyError>;
}

/// Error type for reminder delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The recipient address was refused.
    #[error("Recipient rejected: {0}")]
    Rejected(String),
    /// Transport failure (e.g., relay unreachable).
    #[error("Transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_error_display() {
        let err = NotifyError::Rejected("bad@".to_string());
        assert_eq!(err.to_string(), "Recipient rejected: bad@");

        let err = NotifyError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }
}
