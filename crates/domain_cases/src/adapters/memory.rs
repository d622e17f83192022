//! In-memory `CasePort` adapter
//!
//! Child records are kept in their own maps keyed by case id, mirroring the
//! table layout of the database adapter, so a cascading delete is something
//! the adapter actually has to do rather than a side effect of dropping a
//! nested struct.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{
    CaseId, DomainPort, HealthCheckResult, HealthCheckable, NotificationId, PortError, ProfileId,
    StakeholderId,
};

use crate::case::Case;
use crate::communication::Communication;
use crate::document::Document;
use crate::note::CaseNote;
use crate::notification::Notification;
use crate::ports::{CasePort, DeletionSummary};
use crate::profile::Profile;
use crate::rtw_plan::RtwPlan;
use crate::stakeholder::Stakeholder;

#[derive(Debug, Default)]
struct Tables {
    /// Case rows with child vectors left empty
    cases: HashMap<CaseId, Case>,
    documents: HashMap<CaseId, Vec<Document>>,
    communications: HashMap<CaseId, Vec<Communication>>,
    notes: HashMap<CaseId, Vec<CaseNote>>,
    stakeholders: HashMap<CaseId, Vec<Stakeholder>>,
    plans: HashMap<CaseId, RtwPlan>,
    profiles: HashMap<ProfileId, Profile>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn assemble(&self, row: &Case) -> Case {
        let mut case = row.clone();
        let id = row.id;
        case.documents = self.documents.get(&id).cloned().unwrap_or_default();
        case.communications = self.communications.get(&id).cloned().unwrap_or_default();
        case.notes = self.notes.get(&id).cloned().unwrap_or_default();
        case.stakeholders = self.stakeholders.get(&id).cloned().unwrap_or_default();
        case.rtw_plan = self.plans.get(&id).cloned();
        case
    }

    /// Splits a case into its row and child tables
    fn insert_full(&mut self, mut case: Case) {
        let id = case.id;
        self.documents.insert(id, std::mem::take(&mut case.documents));
        self.communications.insert(id, std::mem::take(&mut case.communications));
        self.notes.insert(id, std::mem::take(&mut case.notes));
        self.stakeholders.insert(id, std::mem::take(&mut case.stakeholders));
        if let Some(plan) = case.rtw_plan.take() {
            self.plans.insert(id, plan);
        }
        self.cases.insert(id, case);
    }

    fn require_case(&self, id: CaseId) -> Result<(), PortError> {
        if self.cases.contains_key(&id) {
            Ok(())
        } else {
            Err(PortError::not_found("Case", id))
        }
    }
}

/// `CasePort` backed by process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseAdapter {
    tables: Arc<RwLock<Tables>>,
    latency_ms: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryCaseAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with cases (including their child records)
    pub async fn with_cases(cases: Vec<Case>) -> Self {
        let adapter = Self::new();
        {
            let mut tables = adapter.tables.write().await;
            for case in cases {
                tables.insert_full(case);
            }
        }
        adapter
    }

    /// Delays every call by `latency`, to exercise caller timeouts
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Makes every call fail with a connection error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Counts child rows still referencing `case_id`
    pub async fn child_record_count(&self, case_id: CaseId) -> usize {
        let tables = self.tables.read().await;
        tables.documents.get(&case_id).map_or(0, Vec::len)
            + tables.communications.get(&case_id).map_or(0, Vec::len)
            + tables.notes.get(&case_id).map_or(0, Vec::len)
            + tables.stakeholders.get(&case_id).map_or(0, Vec::len)
            + usize::from(tables.plans.contains_key(&case_id))
    }

    /// Counts documents whose owning case no longer exists
    pub async fn orphaned_documents(&self) -> usize {
        let tables = self.tables.read().await;
        tables
            .documents
            .iter()
            .filter(|(case_id, _)| !tables.cases.contains_key(case_id))
            .map(|(_, docs)| docs.len())
            .sum()
    }

    async fn simulate(&self, operation: &str) -> Result<(), PortError> {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(PortError::connection(format!("in-memory store unavailable during {}", operation)));
        }
        Ok(())
    }
}

fn strip_children(case: &Case) -> Case {
    let mut row = case.clone();
    row.documents.clear();
    row.communications.clear();
    row.notes.clear();
    row.stakeholders.clear();
    row.rtw_plan = None;
    row
}

impl DomainPort for InMemoryCaseAdapter {}

#[async_trait]
impl HealthCheckable for InMemoryCaseAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        if self.unavailable.load(Ordering::Relaxed) {
            return HealthCheckResult::unhealthy("memory-case-port", 0, "store marked unavailable");
        }
        let _ = self.tables.read().await.cases.len();
        HealthCheckResult::healthy("memory-case-port", start.elapsed().as_millis() as u64)
    }
}

#[async_trait]
impl CasePort for InMemoryCaseAdapter {
    async fn list_cases(&self) -> Result<Vec<Case>, PortError> {
        self.simulate("list_cases").await?;
        let tables = self.tables.read().await;
        let mut cases: Vec<Case> = tables.cases.values().map(|c| tables.assemble(c)).collect();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cases)
    }

    async fn get_case(&self, id: CaseId) -> Result<Case, PortError> {
        self.simulate("get_case").await?;
        let tables = self.tables.read().await;
        tables
            .cases
            .get(&id)
            .map(|c| tables.assemble(c))
            .ok_or_else(|| PortError::not_found("Case", id))
    }

    async fn create_case(&self, case: &Case) -> Result<Case, PortError> {
        self.simulate("create_case").await?;
        // Check and insert under one write lock so claim numbers stay unique
        let mut tables = self.tables.write().await;
        if tables.cases.values().any(|c| c.claim_number == case.claim_number) {
            return Err(PortError::conflict(format!(
                "claim number {} already exists",
                case.claim_number
            )));
        }
        tables.insert_full(case.clone());
        debug!(case_id = %case.id, "case inserted");
        Ok(case.clone())
    }

    async fn update_case(&self, case: &Case) -> Result<Case, PortError> {
        self.simulate("update_case").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(case.id)?;
        if tables
            .cases
            .values()
            .any(|c| c.id != case.id && c.claim_number == case.claim_number)
        {
            return Err(PortError::conflict(format!(
                "claim number {} already exists",
                case.claim_number
            )));
        }
        let row = strip_children(case);
        tables.cases.insert(case.id, row);
        let stored = &tables.cases[&case.id];
        Ok(tables.assemble(stored))
    }

    async fn delete_case(&self, id: CaseId) -> Result<DeletionSummary, PortError> {
        self.simulate("delete_case").await?;
        let mut tables = self.tables.write().await;
        if tables.cases.remove(&id).is_none() {
            return Err(PortError::not_found("Case", id));
        }

        let summary = DeletionSummary {
            documents: tables.documents.remove(&id).map_or(0, |v| v.len()),
            communications: tables.communications.remove(&id).map_or(0, |v| v.len()),
            notes: tables.notes.remove(&id).map_or(0, |v| v.len()),
            stakeholders: tables.stakeholders.remove(&id).map_or(0, |v| v.len()),
            plans: usize::from(tables.plans.remove(&id).is_some()),
        };
        for notification in tables.notifications.iter_mut() {
            if notification.case_id == Some(id) {
                notification.case_id = None;
            }
        }
        Ok(summary)
    }

    async fn add_document(&self, document: &Document) -> Result<(), PortError> {
        self.simulate("add_document").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(document.case_id)?;
        tables.documents.entry(document.case_id).or_default().push(document.clone());
        Ok(())
    }

    async fn list_documents(&self, case_id: CaseId) -> Result<Vec<Document>, PortError> {
        self.simulate("list_documents").await?;
        let tables = self.tables.read().await;
        tables.require_case(case_id)?;
        Ok(tables.documents.get(&case_id).cloned().unwrap_or_default())
    }

    async fn add_communication(&self, communication: &Communication) -> Result<(), PortError> {
        self.simulate("add_communication").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(communication.case_id)?;
        tables
            .communications
            .entry(communication.case_id)
            .or_default()
            .push(communication.clone());
        Ok(())
    }

    async fn add_note(&self, note: &CaseNote) -> Result<(), PortError> {
        self.simulate("add_note").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(note.case_id)?;
        tables.notes.entry(note.case_id).or_default().push(note.clone());
        Ok(())
    }

    async fn add_stakeholder(&self, stakeholder: &Stakeholder) -> Result<(), PortError> {
        self.simulate("add_stakeholder").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(stakeholder.case_id)?;
        tables
            .stakeholders
            .entry(stakeholder.case_id)
            .or_default()
            .push(stakeholder.clone());
        Ok(())
    }

    async fn remove_stakeholder(&self, case_id: CaseId, id: StakeholderId) -> Result<(), PortError> {
        self.simulate("remove_stakeholder").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(case_id)?;
        let list = tables.stakeholders.entry(case_id).or_default();
        let before = list.len();
        list.retain(|s| s.id != id);
        if list.len() == before {
            return Err(PortError::not_found("Stakeholder", id));
        }
        Ok(())
    }

    async fn save_rtw_plan(&self, plan: &RtwPlan) -> Result<(), PortError> {
        self.simulate("save_rtw_plan").await?;
        let mut tables = self.tables.write().await;
        tables.require_case(plan.case_id)?;
        tables.plans.insert(plan.case_id, plan.clone());
        Ok(())
    }

    async fn get_profile(&self, id: ProfileId) -> Result<Profile, PortError> {
        self.simulate("get_profile").await?;
        self.tables
            .read()
            .await
            .profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Profile", id))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), PortError> {
        self.simulate("upsert_profile").await?;
        self.tables.write().await.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn create_notification(&self, notification: &Notification) -> Result<(), PortError> {
        self.simulate("create_notification").await?;
        self.tables.write().await.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_notifications(&self, recipient: ProfileId) -> Result<Vec<Notification>, PortError> {
        self.simulate("list_notifications").await?;
        let tables = self.tables.read().await;
        let mut found: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_notification_read(
        &self,
        recipient: ProfileId,
        id: NotificationId,
    ) -> Result<(), PortError> {
        self.simulate("mark_notification_read").await?;
        let mut tables = self.tables.write().await;
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient)
            .ok_or_else(|| PortError::not_found("Notification", id))?;
        if notification.read_at.is_none() {
            notification.read_at = Some(Utc::now());
        }
        Ok(())
    }
}
