//! Repository implementations
//!
//! Repositories own the SQL. They speak `DatabaseError` and hand back domain
//! records or row types; adapters translate to the port interface.

pub mod cases;
pub mod profiles;

pub use cases::CaseRepository;
pub use profiles::{NotificationRow, ProfileRepository, ProfileRow};
