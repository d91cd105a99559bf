//! Notification formatting and delivery.

pub mod compose;
pub mod dispatcher;
pub mod email;
pub mod graph;

pub use dispatcher::NotificationDispatcher;
pub use email::EmailService;
pub use graph::{Directory, GraphResolver};
