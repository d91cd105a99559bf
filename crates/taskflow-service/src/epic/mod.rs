//! Epic lifecycle.

pub mod service;

pub use service::EpicService;
