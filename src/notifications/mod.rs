use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    accounts::entity::Account,
    config::{EmailConfig, EmailProvider},
};

mod console;
mod message;
mod sendgrid;
#[cfg(test)]
pub mod mock;

pub use console::ConsoleNotifier;
pub use message::EmailMessage;
pub use sendgrid::SendGridNotifier;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("email transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("email provider is not configured: {0}")]
    Misconfigured(&'static str),
}

/// Outbound notifications sent after an account is created or updated.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_account_created(&self, account: &Account) -> Result<(), NotificationError>;
    async fn send_account_updated(&self, account: &Account) -> Result<(), NotificationError>;
}

/// Builds the notifier selected by `EMAIL_PROVIDER`.
pub fn from_config(cfg: &EmailConfig) -> Result<Arc<dyn Notifier>, NotificationError> {
    let notifier: Arc<dyn Notifier> = match cfg.provider {
        EmailProvider::Console => Arc::new(ConsoleNotifier::new(cfg.from.clone())),
        EmailProvider::SendGrid => {
            let api_key = cfg
                .api_key
                .clone()
                .ok_or(NotificationError::Misconfigured("EMAIL_API_KEY"))?;
            Arc::new(SendGridNotifier::new(
                cfg.api_url.clone(),
                api_key,
                cfg.from.clone(),
            )?)
        }
    };
    Ok(notifier)
}
