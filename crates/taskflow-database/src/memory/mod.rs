//! In-memory stores with the same interface as the PostgreSQL ones.
//!
//! Used when wiring the services without a database (tests, local demos).
//! Both stores can be switched into a failing mode to exercise error paths.

pub mod audit;
pub mod repository;

pub use audit::MemoryAuditStore;
pub use repository::MemoryRepository;
