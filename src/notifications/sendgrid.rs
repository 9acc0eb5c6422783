use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use super::{EmailMessage, NotificationError, Notifier};
use crate::accounts::entity::Account;

/// Sends emails through the SendGrid v3 `mail/send` API.
pub struct SendGridNotifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl SendGridNotifier {
    pub fn new(api_url: String, api_key: String, from: String) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
            from,
        })
    }

    fn payload(&self, msg: &EmailMessage) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": msg.to }] }],
            "from": { "email": self.from },
            "subject": msg.subject,
            "content": [
                { "type": "text/plain", "value": msg.text },
                { "type": "text/html", "value": msg.html },
            ],
        })
    }

    #[instrument(skip(self, msg), fields(to = %msg.to, subject = %msg.subject))]
    async fn send(&self, msg: EmailMessage) -> Result<(), NotificationError> {
        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(&msg))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "sendgrid request failed");
                NotificationError::from(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%status, "sendgrid rejected message");
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(%status, "email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send_account_created(&self, account: &Account) -> Result<(), NotificationError> {
        self.send(EmailMessage::account_created(account)).await
    }

    async fn send_account_updated(&self, account: &Account) -> Result<(), NotificationError> {
        self.send(EmailMessage::account_updated(account)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_has_sendgrid_shape() {
        let notifier = SendGridNotifier::new(
            "http://localhost/v3/mail/send".into(),
            "SG.key".into(),
            "no-reply@example.com".into(),
        )
        .expect("client builds");
        let msg = EmailMessage {
            to: "a@x.com".into(),
            subject: "Hi".into(),
            text: "plain".into(),
            html: "<p>html</p>".into(),
        };
        let body = notifier.payload(&msg);
        assert_eq!(body["personalizations"][0]["to"][0]["email"], "a@x.com");
        assert_eq!(body["from"]["email"], "no-reply@example.com");
        assert_eq!(body["subject"], "Hi");
        assert_eq!(body["content"][0]["type"], "text/plain");
        assert_eq!(body["content"][1]["value"], "<p>html</p>");
    }
}
