//! PostgreSQL repository implementations for all Taskflow entities.

pub mod audit;
pub mod epic;
pub mod project;
pub mod sla_rule;
pub mod story;
pub mod user;

pub use audit::{AuditLogRepository, AuditStore};
pub use epic::EpicRepository;
pub use project::ProjectRepository;
pub use sla_rule::SlaRuleRepository;
pub use story::StoryRepository;
pub use user::UserRepository;
