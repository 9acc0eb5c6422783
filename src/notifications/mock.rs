use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{NotificationError, Notifier};
use crate::accounts::entity::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sent {
    Created(Uuid),
    Updated(Uuid),
}

/// Records every notification; optionally fails all of them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, event: Sent) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::Rejected {
                status: 503,
                body: "provider down".into(),
            });
        }
        self.sent.lock().unwrap().push(event);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_account_created(&self, account: &Account) -> Result<(), NotificationError> {
        self.record(Sent::Created(account.id))
    }

    async fn send_account_updated(&self, account: &Account) -> Result<(), NotificationError> {
        self.record(Sent::Updated(account.id))
    }
}
