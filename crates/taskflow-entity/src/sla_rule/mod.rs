//! SLA rule entities.

pub mod model;
pub mod policy;

pub use model::SlaRule;
pub use policy::{SlaPriority, SlaStartPoint};
