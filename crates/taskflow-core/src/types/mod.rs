//! Shared value types.

pub mod pagination;
pub mod trace;

pub use pagination::{PageRequest, PageResponse};
pub use trace::TraceId;
