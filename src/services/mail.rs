//! Outbound notification mail boundary.
//!
//! Actual SMTP dispatch is out of scope; the shipped [`LogMailer`] records
//! every mail to the structured log so operators can see what would have
//! gone out, and tests can swap in their own sink.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Plain-text notification mail.
#[derive(Debug, Clone)]
pub struct NotificationEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: NotificationEmail) -> Result<(), MailError>;
}

/// Structured-log mail sink.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: NotificationEmail) -> Result<(), MailError> {
        info!(
            recipient = %email.recipient,
            subject = %email.subject,
            "Outbound notification mail"
        );
        debug!(body = %email.body, "Notification mail body");
        Ok(())
    }
}
