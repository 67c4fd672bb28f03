//! Mock notifier for testing without a mail transport.

use super::{Notifier, NotifyError, Reminder};
use crate::domain::UserId;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Records every reminder it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<Reminder>>>,
    failing: HashSet<UserId>,
    rejecting: HashSet<UserId>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to this user fail with a transport error.
    pub fn failing_for(mut self, user_id: UserId) -> Self {
        self.failing.insert(user_id);
        self
    }

    /// Make sends to this user fail as a refused recipient.
    pub fn rejecting_for(mut self, user_id: UserId) -> Self {
        self.rejecting.insert(user_id);
        self
    }

    /// Reminders delivered so far.
    pub fn sent(&self) -> Vec<Reminder> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_reminder(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        if self.failing.contains(&reminder.user_id) {
            return Err(NotifyError::Transport("mock relay down".to_string()));
        }
        if self.rejecting.contains(&reminder.user_id) {
            return Err(NotifyError::Rejected(reminder.email.clone()));
        }
        self.sent
            .lock()
            .map_err(|_| NotifyError::Transport("mock poisoned".to_string()))?
            .push(reminder.clone());
        Ok(())
    }
}
