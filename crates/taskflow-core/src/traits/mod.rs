//! Core traits defined in `taskflow-core` and implemented by other crates.

pub mod entity;
pub mod mail;
pub mod repository;

pub use entity::Entity;
pub use mail::{Attachment, EmailMessage, MailTransport};
pub use repository::Repository;
