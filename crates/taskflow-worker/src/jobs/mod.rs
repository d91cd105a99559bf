//! Job implementations.

pub mod sweep;

pub use sweep::{DeadlineSweep, SweepReport};
