//! # taskflow-database
//!
//! PostgreSQL connection management, concrete repository implementations
//! for all Taskflow entities, and an in-memory store with the same
//! interface.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::{MemoryAuditStore, MemoryRepository};
pub use repositories::AuditStore;
