//! Background work for Taskflow.
//!
//! This crate provides:
//! - The deadline sweep that announces overdue tasks and SLA breaches
//! - A scheduler that runs the sweep on a fixed interval

pub mod jobs;
pub mod scheduler;

pub use jobs::{DeadlineSweep, SweepReport};
pub use scheduler::SweepScheduler;
