//! Email sending boundary that never fails its caller.

use std::sync::Arc;

use tracing::{info, warn};

use taskflow_core::traits::{EmailMessage, MailTransport};

/// Hands messages to a transport, logging instead of propagating failures.
#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
}

impl EmailService {
    /// Creates a new email service.
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Send a plain-text message. Returns whether delivery succeeded.
    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> bool {
        self.send(EmailMessage::new(to, subject, body)).await
    }

    /// Send a plain-text message with one attachment.
    pub async fn send_email_with_attachment(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        filename: &str,
        content: Vec<u8>,
    ) -> bool {
        self.send(EmailMessage::new(to, subject, body).with_attachment(filename, content))
            .await
    }

    /// Send a prepared message.
    pub async fn send(&self, message: EmailMessage) -> bool {
        match self.transport.deliver(&message).await {
            Ok(()) => {
                info!(to = %message.to, subject = %message.subject, "Email dispatched");
                true
            }
            Err(e) => {
                warn!(
                    to = %message.to,
                    subject = %message.subject,
                    error = %e,
                    "Failed to send email"
                );
                false
            }
        }
    }
}
