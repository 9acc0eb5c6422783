use async_trait::async_trait;
use tracing::info;

use super::{EmailMessage, NotificationError, Notifier};
use crate::accounts::entity::Account;

/// Logs emails instead of sending them.
pub struct ConsoleNotifier {
    from: String,
}

impl ConsoleNotifier {
    pub fn new(from: String) -> Self {
        Self { from }
    }

    fn emit(&self, msg: &EmailMessage) {
        info!(
            from = %self.from,
            to = %msg.to,
            subject = %msg.subject,
            body = %msg.text,
            "email (console)"
        );
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_account_created(&self, account: &Account) -> Result<(), NotificationError> {
        self.emit(&EmailMessage::account_created(account));
        Ok(())
    }

    async fn send_account_updated(&self, account: &Account) -> Result<(), NotificationError> {
        self.emit(&EmailMessage::account_updated(account));
        Ok(())
    }
}
