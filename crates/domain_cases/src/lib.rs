//! RTW Case Management Domain
//!
//! This crate implements the workers'-compensation return-to-work case: the
//! worker, employer and injury it describes, the records a case manager
//! attaches to it, and the RTW plan that gets the worker back on the job.
//!
//! # Case Lifecycle
//!
//! ```text
//! New -> Active <-> OnHold
//!          |  ^
//!          v  |
//!     ReturnedToWork -> Closed -> Reopened -> Active
//! ```
//!
//! Child records (documents, communications, notes, stakeholders) and the
//! RTW plan belong to exactly one case and are removed with it.

pub mod case;
pub mod document;
pub mod communication;
pub mod note;
pub mod stakeholder;
pub mod compensation;
pub mod rtw_plan;
pub mod profile;
pub mod notification;
pub mod ports;
pub mod adapters;
pub mod store;
pub mod error;

pub use case::{Case, CaseStatus, CasePriority, Worker, Employer, Injury};
pub use document::{Document, DocumentCategory};
pub use communication::{Communication, CommunicationChannel, Direction};
pub use note::{CaseNote, NoteKind};
pub use stakeholder::{Stakeholder, StakeholderRole};
pub use compensation::Compensation;
pub use rtw_plan::{
    RtwPlan, PlanStatus, HoursSchedule, WeekSchedule, DayHours, WorkDay,
    SuggestedFields, DEFAULT_PROGRESSION, DEFAULT_DAILY_HOURS,
};
pub use profile::{Profile, Role};
pub use notification::{Notification, NotificationKind};
pub use ports::{CasePort, DeletionSummary};
pub use adapters::InMemoryCaseAdapter;
pub use store::{CaseStore, ProfileStore, Fetched, StoreTimeouts};
pub use error::CaseError;
