//! Domain Adapters
//!
//! Adapter implementations for domain ports, connecting domain interfaces
//! to the PostgreSQL database layer. Each adapter implements the domain's
//! port trait and delegates SQL to the repository layer.

pub mod cases;

pub use cases::PostgresCaseAdapter;
