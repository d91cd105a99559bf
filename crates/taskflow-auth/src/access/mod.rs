//! Access control over user records.

pub mod checker;
pub mod principal;

pub use checker::AccessControl;
pub use principal::Principal;
