//! Domain stores
//!
//! Stores sit between request handlers and the persistence port. They cache
//! what they load so a slow or unreachable backend degrades to stale data
//! instead of an error, and they enforce the role checks that belong to the
//! domain rather than to any one adapter.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use core_kernel::{CaseId, HealthCheckResult, NotificationId, PortError, ProfileId, StakeholderId};

use crate::case::{Case, CaseStatus};
use crate::communication::Communication;
use crate::compensation::Compensation;
use crate::document::Document;
use crate::error::CaseError;
use crate::note::{CaseNote, NoteKind};
use crate::notification::{Notification, NotificationKind};
use crate::ports::{CasePort, DeletionSummary};
use crate::profile::{Profile, Role};
use crate::rtw_plan::{PlanStatus, RtwPlan, SuggestedFields};
use crate::stakeholder::Stakeholder;

/// Upper bounds on how long a store waits for the persistence port
#[derive(Debug, Clone, Copy)]
pub struct StoreTimeouts {
    pub list: Duration,
    pub detail: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(15),
            detail: Duration::from_secs(10),
        }
    }
}

/// A value read through a store, flagged when it came from the cache
/// because the backend did not answer
#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub value: T,
    pub stale: bool,
}

impl<T> Fetched<T> {
    fn fresh(value: T) -> Self {
        Self { value, stale: false }
    }

    fn stale(value: T) -> Self {
        Self { value, stale: true }
    }
}

/// Races a port call against `limit`, mapping an elapsed timer to `PortError::Timeout`
async fn bounded<T, F>(operation: &str, limit: Duration, call: F) -> Result<T, PortError>
where
    F: Future<Output = Result<T, PortError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(PortError::timeout(operation, limit)),
    }
}

/// Cached, port-backed access to cases
pub struct CaseStore {
    port: Arc<dyn CasePort>,
    /// `None` until the first successful list
    cache: RwLock<Option<Vec<Case>>>,
    timeouts: StoreTimeouts,
}

impl CaseStore {
    pub fn new(port: Arc<dyn CasePort>) -> Self {
        Self::with_timeouts(port, StoreTimeouts::default())
    }

    pub fn with_timeouts(port: Arc<dyn CasePort>, timeouts: StoreTimeouts) -> Self {
        Self {
            port,
            cache: RwLock::new(None),
            timeouts,
        }
    }

    pub fn port(&self) -> Arc<dyn CasePort> {
        Arc::clone(&self.port)
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        self.port.health_check().await
    }

    /// Currently cached cases, without touching the backend
    pub async fn cached(&self) -> Vec<Case> {
        self.cache.read().await.clone().unwrap_or_default()
    }

    /// Reloads the case list
    ///
    /// On timeout or a transient port failure the previously cached list is
    /// returned and marked stale. With nothing cached the error propagates.
    pub async fn refresh(&self) -> Result<Fetched<Vec<Case>>, CaseError> {
        match bounded("list_cases", self.timeouts.list, self.port.list_cases()).await {
            Ok(cases) => {
                debug!(count = cases.len(), "case list refreshed");
                *self.cache.write().await = Some(cases.clone());
                Ok(Fetched::fresh(cases))
            }
            Err(e) if e.is_transient() => match self.cache.read().await.clone() {
                Some(cases) => {
                    warn!(error = %e, "case list refresh failed, serving cached list");
                    Ok(Fetched::stale(cases))
                }
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Loads one case, falling back to the cached copy when the backend is slow
    pub async fn get(&self, id: CaseId) -> Result<Fetched<Case>, CaseError> {
        match bounded("get_case", self.timeouts.detail, self.port.get_case(id)).await {
            Ok(case) => {
                self.upsert_cached(case.clone()).await;
                Ok(Fetched::fresh(case))
            }
            Err(e) if e.is_transient() => match self.find_cached(id).await {
                Some(case) => {
                    warn!(case_id = %id, error = %e, "case fetch failed, serving cached copy");
                    Ok(Fetched::stale(case))
                }
                None => Err(e.into()),
            },
            Err(e) => {
                if e.is_not_found() {
                    self.evict(id).await;
                }
                Err(e.into())
            }
        }
    }

    /// Persists a newly opened case and notifies its case manager
    pub async fn create(&self, case: Case, actor: &Profile) -> Result<Case, CaseError> {
        // The case manager must exist
        self.port.get_profile(case.case_manager_id).await?;

        let created = self.port.create_case(&case).await.map_err(|e| match e {
            PortError::Conflict { .. } => CaseError::DuplicateClaimNumber(case.claim_number.clone()),
            other => other.into(),
        })?;
        info!(case_id = %created.id, claim_number = %created.claim_number, actor = %actor.id, "case created");

        self.upsert_cached(created.clone()).await;
        self.notify(
            created.case_manager_id,
            Some(created.id),
            NotificationKind::CaseAssigned,
            format!("Case {} for {} assigned to you", created.claim_number, created.worker.full_name()),
        )
        .await;
        Ok(created)
    }

    /// Persists edits to the case's own fields
    pub async fn update(&self, case: Case) -> Result<Case, CaseError> {
        let updated = self.port.update_case(&case).await.map_err(|e| match e {
            PortError::Conflict { .. } => CaseError::DuplicateClaimNumber(case.claim_number.clone()),
            other => other.into(),
        })?;
        self.upsert_cached(updated.clone()).await;
        Ok(updated)
    }

    pub async fn update_status(&self, id: CaseId, status: CaseStatus) -> Result<Case, CaseError> {
        let mut case = self.get(id).await?.value;
        case.update_status(status)?;
        let updated = self.update(case).await?;
        info!(case_id = %id, status = status.as_str(), "case status changed");
        Ok(updated)
    }

    /// Hands the case to a different case manager
    pub async fn assign_case_manager(&self, id: CaseId, case_manager_id: ProfileId) -> Result<Case, CaseError> {
        // The new case manager must exist
        self.port.get_profile(case_manager_id).await?;

        let mut case = self.get(id).await?.value;
        case.assign_case_manager(case_manager_id);
        let updated = self.update(case).await?;
        self.notify(
            case_manager_id,
            Some(id),
            NotificationKind::CaseAssigned,
            format!("Case {} reassigned to you", updated.claim_number),
        )
        .await;
        Ok(updated)
    }

    pub async fn set_compensation(&self, id: CaseId, compensation: Compensation) -> Result<Case, CaseError> {
        let mut case = self.get(id).await?.value;
        case.compensation = compensation;
        self.update(case).await
    }

    /// Deletes a case and everything it owns
    ///
    /// The case leaves the cached list exactly once; deleting an id that is
    /// already gone reports `CaseNotFound` and leaves the list untouched.
    pub async fn delete(&self, id: CaseId, actor: &Profile) -> Result<DeletionSummary, CaseError> {
        if !actor.can_delete_case() {
            return Err(CaseError::Forbidden(format!(
                "role {} may not delete cases",
                actor.role.as_str()
            )));
        }

        let summary = self.port.delete_case(id).await?;
        self.evict(id).await;
        info!(
            case_id = %id,
            actor = %actor.id,
            removed_children = summary.total(),
            "case deleted"
        );
        Ok(summary)
    }

    pub async fn add_document(&self, document: Document) -> Result<Document, CaseError> {
        self.port.add_document(&document).await?;
        let case_id = document.case_id;
        let doc = document.clone();
        let manager = self.mutate_cached(case_id, move |c| c.add_document(doc)).await;
        if let Some(manager) = manager.filter(|m| *m != document.uploaded_by) {
            self.notify(
                manager,
                Some(case_id),
                NotificationKind::DocumentUploaded,
                format!("{} uploaded", document.file_name),
            )
            .await;
        }
        Ok(document)
    }

    pub async fn list_documents(&self, case_id: CaseId) -> Result<Vec<Document>, CaseError> {
        Ok(bounded("list_documents", self.timeouts.detail, self.port.list_documents(case_id)).await?)
    }

    pub async fn add_communication(&self, communication: Communication) -> Result<Communication, CaseError> {
        self.port.add_communication(&communication).await?;
        let entry = communication.clone();
        self.mutate_cached(communication.case_id, move |c| c.add_communication(entry)).await;
        Ok(communication)
    }

    /// Adds a note; supervisor notes require a supervisor or admin author
    pub async fn add_note(&self, note: CaseNote, author: &Profile) -> Result<CaseNote, CaseError> {
        if note.kind == NoteKind::Supervisor && !author.can_write_supervisor_notes() {
            return Err(CaseError::Forbidden(format!(
                "role {} may not write supervisor notes",
                author.role.as_str()
            )));
        }
        self.port.add_note(&note).await?;
        let entry = note.clone();
        self.mutate_cached(note.case_id, move |c| c.add_note(entry)).await;
        Ok(note)
    }

    pub async fn add_stakeholder(&self, stakeholder: Stakeholder) -> Result<Stakeholder, CaseError> {
        self.port.add_stakeholder(&stakeholder).await?;
        let entry = stakeholder.clone();
        self.mutate_cached(stakeholder.case_id, move |c| c.add_stakeholder(entry)).await;
        Ok(stakeholder)
    }

    pub async fn remove_stakeholder(&self, case_id: CaseId, id: StakeholderId) -> Result<(), CaseError> {
        self.port.remove_stakeholder(case_id, id).await?;
        self.mutate_cached(case_id, move |c| c.stakeholders.retain(|s| s.id != id)).await;
        Ok(())
    }

    /// Saves the plan; activating a plan notifies the case manager
    pub async fn save_plan(&self, plan: RtwPlan) -> Result<RtwPlan, CaseError> {
        plan.check_dates()?;
        self.port.save_rtw_plan(&plan).await?;
        let entry = plan.clone();
        let manager = self.mutate_cached(plan.case_id, move |c| c.set_rtw_plan(entry)).await;
        if plan.status == PlanStatus::Active {
            if let Some(manager) = manager {
                self.notify(manager, Some(plan.case_id), NotificationKind::PlanReady, "RTW plan is active").await;
            }
        }
        Ok(plan)
    }

    /// Merges AI-suggested fields into the case's plan, creating a draft if needed
    pub async fn apply_plan_suggestion(&self, id: CaseId, suggestion: &SuggestedFields) -> Result<RtwPlan, CaseError> {
        let case = self.get(id).await?.value;
        let mut plan = case.rtw_plan.unwrap_or_else(|| RtwPlan::draft(id));
        plan.apply_suggestion(suggestion);
        self.save_plan(plan).await
    }

    /// Renders the case's plan for printing once every required field is filled
    pub async fn printable_plan(&self, id: CaseId) -> Result<String, CaseError> {
        let case = self.get(id).await?.value;
        let plan = case.rtw_plan.as_ref().ok_or(CaseError::NoPlan)?;
        plan.render_printable(&case)
    }

    async fn notify(&self, recipient: ProfileId, case_id: Option<CaseId>, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification::new(recipient, case_id, kind, message);
        if let Err(e) = self.port.create_notification(&notification).await {
            warn!(recipient = %recipient, error = %e, "failed to record notification");
        }
    }

    async fn find_cached(&self, id: CaseId) -> Option<Case> {
        self.cache
            .read()
            .await
            .as_ref()
            .and_then(|cases| cases.iter().find(|c| c.id == id).cloned())
    }

    async fn upsert_cached(&self, case: Case) {
        let mut cache = self.cache.write().await;
        let cases = cache.get_or_insert_with(Vec::new);
        match cases.iter_mut().find(|c| c.id == case.id) {
            Some(existing) => *existing = case,
            None => cases.insert(0, case),
        }
    }

    /// Applies `f` to the cached case, returning its case manager when cached
    async fn mutate_cached<F>(&self, id: CaseId, f: F) -> Option<ProfileId>
    where
        F: FnOnce(&mut Case),
    {
        let mut cache = self.cache.write().await;
        let case = cache.as_mut()?.iter_mut().find(|c| c.id == id)?;
        f(case);
        Some(case.case_manager_id)
    }

    async fn evict(&self, id: CaseId) {
        if let Some(cases) = self.cache.write().await.as_mut() {
            cases.retain(|c| c.id != id);
        }
    }
}

/// How long a looked-up profile is trusted before it is read again
pub const PROFILE_CACHE_TTL: Duration = Duration::from_secs(60);

struct CachedProfile {
    profile: Profile,
    loaded_at: Instant,
}

/// Profile lookups for authenticated users
pub struct ProfileStore {
    port: Arc<dyn CasePort>,
    cache: RwLock<HashMap<ProfileId, CachedProfile>>,
    ttl: Duration,
}

impl ProfileStore {
    pub fn new(port: Arc<dyn CasePort>) -> Self {
        Self::with_ttl(port, PROFILE_CACHE_TTL)
    }

    pub fn with_ttl(port: Arc<dyn CasePort>, ttl: Duration) -> Self {
        Self {
            port,
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the profile for an authenticated user
    ///
    /// A missing profile is `CaseError::ProfileNotFound`, which callers treat
    /// as "not found" rather than a failure. Entries older than the TTL are
    /// re-read so role changes made elsewhere are picked up; an unreachable
    /// backend keeps serving the last copy.
    pub async fn current(&self, id: ProfileId) -> Result<Profile, CaseError> {
        let cached = self.cache.read().await.get(&id).map(|c| (c.profile.clone(), c.loaded_at));
        if let Some((profile, loaded_at)) = &cached {
            if loaded_at.elapsed() < self.ttl {
                return Ok(profile.clone());
            }
        }

        match self.port.get_profile(id).await {
            Ok(profile) => {
                self.remember(profile.clone()).await;
                Ok(profile)
            }
            Err(e) if e.is_transient() => match cached {
                Some((profile, _)) => {
                    warn!(profile_id = %id, error = %e, "profile fetch failed, serving cached copy");
                    Ok(profile)
                }
                None => Err(e.into()),
            },
            Err(e) => {
                if e.is_not_found() {
                    self.forget(id).await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn save(&self, profile: Profile) -> Result<Profile, CaseError> {
        self.port.upsert_profile(&profile).await?;
        self.remember(profile.clone()).await;
        Ok(profile)
    }

    /// Creates or refreshes the caller's own profile
    ///
    /// New profiles start as case managers. An existing profile keeps its
    /// role; only the name and email change.
    pub async fn provision(
        &self,
        id: ProfileId,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Profile, CaseError> {
        let (full_name, email) = (full_name.into(), email.into());
        let profile = match self.port.get_profile(id).await {
            Ok(mut existing) => {
                existing.full_name = full_name;
                existing.email = email;
                existing
            }
            Err(e) if e.is_not_found() => {
                info!(profile_id = %id, "provisioning new profile");
                Profile::new(id, full_name, email, Role::CaseManager)
            }
            Err(e) => return Err(e.into()),
        };
        self.save(profile).await
    }

    /// Changes another user's role; admins only
    pub async fn set_role(&self, actor: &Profile, id: ProfileId, role: Role) -> Result<Profile, CaseError> {
        if actor.role != Role::Admin {
            return Err(CaseError::Forbidden(format!(
                "Role {} may not change user roles",
                actor.role.as_str()
            )));
        }
        let mut profile = self.port.get_profile(id).await?;
        profile.role = role;
        let saved = self.save(profile).await?;
        info!(profile_id = %id, role = role.as_str(), actor = %actor.id, "profile role changed");
        Ok(saved)
    }

    /// Makes sure `id` exists with the admin role
    ///
    /// Used at startup so a fresh deployment has someone who can assign roles.
    pub async fn ensure_admin(&self, id: ProfileId, email: &str) -> Result<Profile, CaseError> {
        let profile = match self.port.get_profile(id).await {
            Ok(existing) if existing.role == Role::Admin => return Ok(existing),
            Ok(mut existing) => {
                existing.role = Role::Admin;
                existing
            }
            Err(e) if e.is_not_found() => Profile::new(id, "Administrator", email, Role::Admin),
            Err(e) => return Err(e.into()),
        };
        self.save(profile).await
    }

    pub async fn notifications(&self, id: ProfileId) -> Result<Vec<Notification>, CaseError> {
        Ok(self.port.list_notifications(id).await?)
    }

    pub async fn mark_notification_read(&self, id: ProfileId, notification: NotificationId) -> Result<(), CaseError> {
        Ok(self.port.mark_notification_read(id, notification).await?)
    }

    /// Drops the cached profile so the next lookup hits the backend
    pub async fn forget(&self, id: ProfileId) {
        self.cache.write().await.remove(&id);
    }

    async fn remember(&self, profile: Profile) {
        let entry = CachedProfile { profile, loaded_at: Instant::now() };
        self.cache.write().await.insert(entry.profile.id, entry);
    }
}
