//! # taskflow-entity
//!
//! Domain entity models for Taskflow. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod epic;
pub mod graph;
pub mod project;
pub mod sla_rule;
pub mod story;
pub mod user;

pub use audit::{AuditFilter, AuditLog, AuditStatistics, NewAuditLog, OperationType};
pub use epic::Epic;
pub use graph::{EpicGraph, StoryGraph};
pub use project::Project;
pub use sla_rule::{SlaPriority, SlaRule, SlaStartPoint};
pub use story::{CreateStory, Story, UpdateStory};
pub use user::{CreateUser, UpdateUser, User, UserRole};
