//! Async SMTP transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use taskflow_core::config::MailConfig;
use taskflow_core::result::AppResult;
use taskflow_core::traits::{EmailMessage, MailTransport};

use crate::error::MailError;

/// Sends plain-text messages, optionally with one attachment, over SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

impl SmtpMailer {
    /// Build the transport. The connection is made lazily on first send.
    #[tracing::instrument(
        name = "smtp_mailer_new",
        skip(config),
        fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
    )]
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from_mailbox = sender_mailbox(config)?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Connection(format!("{e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let mut builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        debug!("SMTP transport initialized");

        Ok(Self {
            transport: builder.build(),
            from_mailbox,
        })
    }

    /// Check that the SMTP server is reachable.
    pub async fn check_health(&self) -> Result<(), MailError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Connection(format!("{e}")))?;
        Ok(())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    #[tracing::instrument(
        name = "smtp_deliver",
        skip(self, message),
        fields(to = %message.to, subject = %message.subject)
    )]
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()> {
        let built = build_message(&self.from_mailbox, message)?;

        self.transport
            .send(built)
            .await
            .map_err(|e| MailError::Send(format!("{e}")))?;

        info!("Email sent");
        Ok(())
    }
}

/// Parse `"<from_name> <from_address>"` into a mailbox.
pub(crate) fn sender_mailbox(config: &MailConfig) -> Result<Mailbox, MailError> {
    format!("{} <{}>", config.from_name, config.from_address)
        .parse()
        .map_err(|e| MailError::Address(format!("{e}")))
}

/// Turn a domain message into a MIME message.
pub(crate) fn build_message(from: &Mailbox, message: &EmailMessage) -> Result<Message, MailError> {
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| MailError::Address(format!("{e}")))?;

    let builder = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(message.subject.as_str());

    let built = match &message.attachment {
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone()),
        Some(attachment) => {
            let content_type = ContentType::parse("application/octet-stream")
                .map_err(|e| MailError::Attachment(format!("{e}")))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(message.body.clone()))
                    .singlepart(
                        Attachment::new(attachment.filename.clone())
                            .body(attachment.content.clone(), content_type),
                    ),
            )
        }
    };

    built.map_err(|e| MailError::Send(format!("failed to build message: {e}")))
}
