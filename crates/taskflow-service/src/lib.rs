//! # taskflow-service
//!
//! Business logic service layer for Taskflow. Each service orchestrates
//! repositories, the access checker, and the notification dispatcher to
//! implement application-level use cases.
//!
//! Cross-cutting concerns are composed explicitly: every service call is
//! wrapped by the [`CallInterceptor`] and every write goes through an
//! [`AuditedRepository`].
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod audit;
pub mod context;
pub mod epic;
pub mod intercept;
pub mod notification;
pub mod story;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::{AuditActor, AuditRecorder, AuditService};
pub use context::RequestContext;
pub use epic::EpicService;
pub use intercept::{AuditedRepository, CallInterceptor};
pub use notification::{Directory, EmailService, GraphResolver, NotificationDispatcher};
pub use story::StoryService;
pub use user::UserService;
