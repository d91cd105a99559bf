//! A transport that records messages in the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use taskflow_core::result::AppResult;
use taskflow_core::traits::{EmailMessage, MailTransport};

/// Logs every message at `info` and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Create a new logging transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for LogMailer {
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            attachment = message.attachment.as_ref().map(|a| a.filename.as_str()),
            "Mail delivery disabled; message not sent"
        );
        Ok(())
    }
}
