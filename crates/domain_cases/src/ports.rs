//! Case Domain Ports
//!
//! `CasePort` is everything the case domain needs from its persistence
//! collaborator. Adapters:
//!
//! - **In-memory**: `InMemoryCaseAdapter` in this crate, for tests and for
//!   running without a database
//! - **PostgreSQL**: `PostgresCaseAdapter` in `infra_db`
//!
//! ```rust,ignore
//! let port: Arc<dyn CasePort> = match config.database_url {
//!     Some(url) => Arc::new(PostgresCaseAdapter::new(create_pool(DatabaseConfig::new(url)).await?)),
//!     None => Arc::new(InMemoryCaseAdapter::new()),
//! };
//! let store = CaseStore::new(port);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{
    CaseId, DomainPort, HealthCheckable, NotificationId, PortError, ProfileId, StakeholderId,
};

use crate::case::Case;
use crate::communication::Communication;
use crate::document::Document;
use crate::note::CaseNote;
use crate::notification::Notification;
use crate::profile::Profile;
use crate::rtw_plan::RtwPlan;
use crate::stakeholder::Stakeholder;

/// Child records removed by a cascading case delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSummary {
    pub documents: usize,
    pub communications: usize,
    pub notes: usize,
    pub stakeholders: usize,
    pub plans: usize,
}

impl DeletionSummary {
    pub fn total(&self) -> usize {
        self.documents + self.communications + self.notes + self.stakeholders + self.plans
    }
}

/// Persistence port for cases and the records hanging off them
///
/// Case-level writes (`create_case`, `update_case`) persist the case's own
/// fields only. Child records go through their dedicated methods.
#[async_trait]
pub trait CasePort: DomainPort + HealthCheckable {
    // ------------------------------------------------------------------
    // Cases
    // ------------------------------------------------------------------

    /// Lists all cases with their child records, newest first
    async fn list_cases(&self) -> Result<Vec<Case>, PortError>;

    /// Retrieves one case with its child records
    ///
    /// Returns `PortError::NotFound` with entity type "Case" when absent.
    async fn get_case(&self, id: CaseId) -> Result<Case, PortError>;

    /// Inserts a new case
    ///
    /// Returns `PortError::Conflict` when the claim number is already taken.
    async fn create_case(&self, case: &Case) -> Result<Case, PortError>;

    /// Persists the case's own fields
    async fn update_case(&self, case: &Case) -> Result<Case, PortError>;

    /// Deletes a case and every child record it owns
    async fn delete_case(&self, id: CaseId) -> Result<DeletionSummary, PortError>;

    // ------------------------------------------------------------------
    // Child records
    // ------------------------------------------------------------------

    async fn add_document(&self, document: &Document) -> Result<(), PortError>;

    async fn list_documents(&self, case_id: CaseId) -> Result<Vec<Document>, PortError>;

    async fn add_communication(&self, communication: &Communication) -> Result<(), PortError>;

    async fn add_note(&self, note: &CaseNote) -> Result<(), PortError>;

    async fn add_stakeholder(&self, stakeholder: &Stakeholder) -> Result<(), PortError>;

    async fn remove_stakeholder(&self, case_id: CaseId, id: StakeholderId) -> Result<(), PortError>;

    /// Inserts or replaces the case's RTW plan
    async fn save_rtw_plan(&self, plan: &RtwPlan) -> Result<(), PortError>;

    // ------------------------------------------------------------------
    // Profiles and notifications
    // ------------------------------------------------------------------

    async fn get_profile(&self, id: ProfileId) -> Result<Profile, PortError>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), PortError>;

    async fn create_notification(&self, notification: &Notification) -> Result<(), PortError>;

    /// Notifications for a recipient, newest first
    async fn list_notifications(&self, recipient: ProfileId) -> Result<Vec<Notification>, PortError>;

    async fn mark_notification_read(
        &self,
        recipient: ProfileId,
        id: NotificationId,
    ) -> Result<(), PortError>;
}
