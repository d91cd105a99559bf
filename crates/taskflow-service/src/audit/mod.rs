//! Audit trail recording and querying.

pub mod diff;
pub mod recorder;
pub mod service;

pub use recorder::{AuditActor, AuditRecorder};
pub use service::AuditService;
