//! Story (task) lifecycle.

pub mod service;

pub use service::StoryService;
