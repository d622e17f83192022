//! Adapters implementing `CasePort`
//!
//! The PostgreSQL adapter lives in `infra_db`; this module provides the
//! in-memory adapter used by tests and database-less deployments.

pub mod memory;

pub use memory::InMemoryCaseAdapter;
