//! Outgoing mail boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub filename: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// A fully formatted plain-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Optional single attachment.
    pub attachment: Option<Attachment>,
}

impl EmailMessage {
    /// Create a message without attachment.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachment: None,
        }
    }

    /// Attach a file to this message.
    pub fn with_attachment(mut self, filename: impl Into<String>, content: Vec<u8>) -> Self {
        self.attachment = Some(Attachment {
            filename: filename.into(),
            content,
        });
        self
    }
}

/// Something that can hand a message to a mail server.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Deliver a single message.
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()>;
}
