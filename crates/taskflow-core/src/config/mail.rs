//! Outgoing mail configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SMTP settings for notification delivery.
///
/// When `enabled` is false notifications are formatted and logged but not
/// delivered.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Whether SMTP delivery is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP server hostname.
    #[serde(default)]
    pub host: String,
    /// SMTP server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional SMTP username.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional SMTP password.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Whether to use STARTTLS.
    #[serde(default = "default_true")]
    pub use_tls: bool,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: default_port(),
            username: None,
            password: None,
            from_address: default_from_address(),
            from_name: default_from_name(),
            use_tls: true,
        }
    }
}

fn default_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "noreply@enterprise.com".to_string()
}

fn default_from_name() -> String {
    "Taskflow".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_password() {
        let config = MailConfig {
            password: Some("super-secret".to_string()),
            ..MailConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
