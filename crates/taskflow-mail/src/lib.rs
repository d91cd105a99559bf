//! # taskflow-mail
//!
//! Implementations of the [`MailTransport`](taskflow_core::traits::MailTransport)
//! boundary: an async SMTP transport built on [`lettre`], and a transport
//! that only logs, used when delivery is disabled.

pub mod error;
pub mod log;
pub mod smtp;

pub use error::MailError;
pub use log::LogMailer;
pub use smtp::SmtpMailer;

use std::sync::Arc;

use taskflow_core::config::MailConfig;
use taskflow_core::traits::MailTransport;

/// Pick a transport for the given configuration.
pub fn transport_from_config(config: &MailConfig) -> Result<Arc<dyn MailTransport>, MailError> {
    if config.enabled {
        Ok(Arc::new(SmtpMailer::new(config)?))
    } else {
        Ok(Arc::new(LogMailer::new()))
    }
}
