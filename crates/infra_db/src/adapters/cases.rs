//! PostgreSQL Case Adapter
//!
//! Implements `CasePort` on top of `CaseRepository` and `ProfileRepository`.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresCaseAdapter;
//! use domain_cases::{CasePort, CaseStore};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn CasePort> = Arc::new(PostgresCaseAdapter::new(pool));
//! let store = CaseStore::new(port);
//! ```

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    CaseId, DomainPort, HealthCheckResult, HealthCheckable, NotificationId, PortError, ProfileId,
    StakeholderId,
};
use domain_cases::{
    Case, CaseNote, CasePort, Communication, DeletionSummary, Document, Notification, Profile,
    RtwPlan, Stakeholder,
};

use crate::error::DatabaseError;
use crate::repositories::{CaseRepository, ProfileRepository};

const ADAPTER_ID: &str = "postgres-case-adapter";

/// PostgreSQL-backed implementation of the CasePort trait
///
/// Database errors are translated to `PortError` via `From<DatabaseError>`:
/// a duplicate claim number becomes `Conflict`, a missing row `NotFound`,
/// and pool or connection failures `Connection` (transient).
#[derive(Debug, Clone)]
pub struct PostgresCaseAdapter {
    cases: CaseRepository,
    profiles: ProfileRepository,
    pool: PgPool,
}

impl PostgresCaseAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cases: CaseRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the underlying case repository
    pub fn repository(&self) -> &CaseRepository {
        &self.cases
    }
}

fn port(error: DatabaseError) -> PortError {
    error.into()
}

impl DomainPort for PostgresCaseAdapter {}

#[async_trait]
impl HealthCheckable for PostgresCaseAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {e}")),
        }
    }
}

#[async_trait]
impl CasePort for PostgresCaseAdapter {
    #[instrument(skip(self))]
    async fn list_cases(&self) -> Result<Vec<Case>, PortError> {
        let cases = self.cases.list().await.map_err(port)?;
        debug!(count = cases.len(), "Fetched cases");
        Ok(cases)
    }

    #[instrument(skip(self), fields(case_id = %id))]
    async fn get_case(&self, id: CaseId) -> Result<Case, PortError> {
        self.cases.get(id.into()).await.map_err(port)
    }

    #[instrument(skip(self, case), fields(case_id = %case.id))]
    async fn create_case(&self, case: &Case) -> Result<Case, PortError> {
        self.cases.insert(case).await.map_err(port)?;
        debug!("Case inserted");
        Ok(case.clone())
    }

    #[instrument(skip(self, case), fields(case_id = %case.id))]
    async fn update_case(&self, case: &Case) -> Result<Case, PortError> {
        self.cases.update(case).await.map_err(port)?;
        self.cases.get(case.id.into()).await.map_err(port)
    }

    #[instrument(skip(self), fields(case_id = %id))]
    async fn delete_case(&self, id: CaseId) -> Result<DeletionSummary, PortError> {
        let summary = self.cases.delete(id.into()).await.map_err(port)?;
        debug!(children = summary.total(), "Case deleted with children");
        Ok(summary)
    }

    async fn add_document(&self, document: &Document) -> Result<(), PortError> {
        self.cases.insert_document(document).await.map_err(port)
    }

    async fn list_documents(&self, case_id: CaseId) -> Result<Vec<Document>, PortError> {
        self.cases.documents(case_id.into()).await.map_err(port)
    }

    async fn add_communication(&self, communication: &Communication) -> Result<(), PortError> {
        self.cases.insert_communication(communication).await.map_err(port)
    }

    async fn add_note(&self, note: &CaseNote) -> Result<(), PortError> {
        self.cases.insert_note(note).await.map_err(port)
    }

    async fn add_stakeholder(&self, stakeholder: &Stakeholder) -> Result<(), PortError> {
        self.cases.insert_stakeholder(stakeholder).await.map_err(port)
    }

    async fn remove_stakeholder(&self, case_id: CaseId, id: StakeholderId) -> Result<(), PortError> {
        self.cases.delete_stakeholder(case_id.into(), id.into()).await.map_err(port)
    }

    async fn save_rtw_plan(&self, plan: &RtwPlan) -> Result<(), PortError> {
        self.cases.upsert_plan(plan).await.map_err(port)
    }

    async fn get_profile(&self, id: ProfileId) -> Result<Profile, PortError> {
        let row = self.profiles.get(id.into()).await.map_err(port)?;
        Profile::try_from(row).map_err(port)
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), PortError> {
        self.profiles.upsert(profile).await.map_err(port)
    }

    async fn create_notification(&self, notification: &Notification) -> Result<(), PortError> {
        self.profiles.insert_notification(notification).await.map_err(port)
    }

    async fn list_notifications(&self, recipient: ProfileId) -> Result<Vec<Notification>, PortError> {
        self.profiles
            .notifications_for(recipient.into())
            .await
            .map_err(port)?
            .into_iter()
            .map(|row| Notification::try_from(row).map_err(port))
            .collect()
    }

    async fn mark_notification_read(
        &self,
        recipient: ProfileId,
        id: NotificationId,
    ) -> Result<(), PortError> {
        self.profiles
            .mark_read(Uuid::from(recipient), Uuid::from(id))
            .await
            .map_err(port)
    }
}
