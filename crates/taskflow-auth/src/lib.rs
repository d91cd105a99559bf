//! # taskflow-auth
//!
//! Authorization for Taskflow.
//!
//! ## Modules
//!
//! - `access`: the user-edit decision table, admin checks, and the
//!   `Principal` seam through which the current user is resolved

pub mod access;

pub use access::{AccessControl, Principal};
