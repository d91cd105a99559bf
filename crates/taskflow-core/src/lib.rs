//! # taskflow-core
//!
//! Core crate for Taskflow. Contains the entity, repository and mail
//! transport traits, configuration schemas, pagination and trace types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Taskflow crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
