//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for RTW cases using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! speak `DatabaseError`, adapters implement the domain ports on top of them
//! and translate errors into `PortError`.
//!
//! Cases and child records are stored as JSONB payloads beside indexed key
//! columns. Child tables cascade on case deletion so no orphaned documents,
//! notes, communications, stakeholders or plans can remain.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresCaseAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/rtw")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresCaseAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::PostgresCaseAdapter;
