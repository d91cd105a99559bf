//! Mail transport errors.

use taskflow_core::error::{AppError, ErrorKind};

/// Errors that can occur while building or sending a message.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The SMTP transport could not be built.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Failed to build or send a message.
    #[error("send failed: {0}")]
    Send(String),

    /// Invalid email address format.
    #[error("invalid email address: {0}")]
    Address(String),

    /// Invalid attachment metadata.
    #[error("invalid attachment: {0}")]
    Attachment(String),
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        let kind = match err {
            MailError::Address(_) | MailError::Attachment(_) => ErrorKind::Validation,
            MailError::Connection(_) | MailError::Send(_) => ErrorKind::ExternalService,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
