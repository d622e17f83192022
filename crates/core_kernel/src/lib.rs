//! Core Kernel - Foundational types shared by the RTW case crates
//!
//! - Strongly-typed identifiers for cases and their child records
//! - Port infrastructure (`PortError`, `DomainPort`, health checks)

pub mod identifiers;
pub mod ports;

pub use identifiers::{
    CaseId, DocumentId, CommunicationId, NoteId, StakeholderId,
    PlanId, ProfileId, NotificationId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
