//! Audit log entities.

pub mod filter;
pub mod model;
pub mod operation;

pub use filter::{AuditFilter, AuditStatistics};
pub use model::{AuditLog, NewAuditLog};
pub use operation::OperationType;
