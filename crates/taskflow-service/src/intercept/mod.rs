//! Explicit interception layers around repositories and service calls.

pub mod audited;
pub mod call;

pub use audited::{AuditedRepository, entity_type_from_store_name};
pub use call::CallInterceptor;
