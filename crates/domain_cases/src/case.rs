//! Case aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, ProfileId};
use crate::communication::Communication;
use crate::compensation::Compensation;
use crate::document::Document;
use crate::error::CaseError;
use crate::note::{CaseNote, NoteKind};
use crate::rtw_plan::RtwPlan;
use crate::stakeholder::Stakeholder;

/// Case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Claim lodged, not yet picked up
    New,
    /// Case manager actively working the case
    Active,
    /// Paused (e.g. awaiting medical review)
    OnHold,
    /// Worker back at pre-injury duties and hours
    ReturnedToWork,
    /// Closed
    Closed,
    /// Reopened after closure
    Reopened,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::New => "new",
            CaseStatus::Active => "active",
            CaseStatus::OnHold => "on_hold",
            CaseStatus::ReturnedToWork => "returned_to_work",
            CaseStatus::Closed => "closed",
            CaseStatus::Reopened => "reopened",
        }
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = CaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(CaseStatus::New),
            "active" => Ok(CaseStatus::Active),
            "on_hold" | "onhold" => Ok(CaseStatus::OnHold),
            "returned_to_work" | "rtw" => Ok(CaseStatus::ReturnedToWork),
            "closed" => Ok(CaseStatus::Closed),
            "reopened" => Ok(CaseStatus::Reopened),
            other => Err(CaseError::validation(format!("Unknown case status '{}'", other))),
        }
    }
}

/// Case priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    #[default]
    Medium,
    High,
}

/// The injured worker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub occupation: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl Worker {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// The pre-injury employer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employer {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Employer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Injury metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    /// Date of injury
    pub date: NaiveDate,
    pub description: String,
    pub body_part: Option<String>,
    pub injury_type: Option<String>,
    /// How it happened (lifting, fall, repetitive strain, ...)
    pub mechanism: Option<String>,
}

impl Injury {
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
            body_part: None,
            injury_type: None,
            mechanism: None,
        }
    }
}

/// A workers'-compensation return-to-work case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Unique identifier
    pub id: CaseId,
    /// Claim number, unique across cases
    pub claim_number: String,
    pub worker: Worker,
    pub employer: Employer,
    pub injury: Injury,
    pub status: CaseStatus,
    pub priority: CasePriority,
    /// The single case manager responsible for the case
    pub case_manager_id: ProfileId,
    pub notes: Vec<CaseNote>,
    pub documents: Vec<Document>,
    pub communications: Vec<Communication>,
    pub stakeholders: Vec<Stakeholder>,
    pub rtw_plan: Option<RtwPlan>,
    pub compensation: Compensation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Opens a new case
    ///
    /// # Errors
    ///
    /// Returns `CaseError::Validation` when the claim number or worker name is
    /// blank, or when the injury date lies in the future.
    pub fn open(
        claim_number: impl Into<String>,
        worker: Worker,
        employer: Employer,
        injury: Injury,
        case_manager_id: ProfileId,
    ) -> Result<Self, CaseError> {
        let claim_number = claim_number.into().trim().to_string();
        if claim_number.is_empty() {
            return Err(CaseError::validation("Claim number is required"));
        }
        if worker.full_name().is_empty() {
            return Err(CaseError::validation("Worker name is required"));
        }
        if injury.date > Utc::now().date_naive() {
            return Err(CaseError::validation("Injury date cannot be in the future"));
        }

        let now = Utc::now();
        Ok(Self {
            id: CaseId::new_v7(),
            claim_number,
            worker,
            employer,
            injury,
            status: CaseStatus::New,
            priority: CasePriority::default(),
            case_manager_id,
            notes: Vec::new(),
            documents: Vec::new(),
            communications: Vec::new(),
            stakeholders: Vec::new(),
            rtw_plan: None,
            compensation: Compensation::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the status
    pub fn update_status(&mut self, status: CaseStatus) -> Result<(), CaseError> {
        if !self.can_transition_to(status) {
            return Err(CaseError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }
        self.status = status;
        self.touch();
        Ok(())
    }

    /// Replaces the case manager. A case always has exactly one.
    pub fn assign_case_manager(&mut self, case_manager_id: ProfileId) {
        self.case_manager_id = case_manager_id;
        self.touch();
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
        self.touch();
    }

    pub fn add_communication(&mut self, communication: Communication) {
        self.communications.push(communication);
        self.touch();
    }

    pub fn add_note(&mut self, note: CaseNote) {
        self.notes.push(note);
        self.touch();
    }

    pub fn add_stakeholder(&mut self, stakeholder: Stakeholder) {
        self.stakeholders.push(stakeholder);
        self.touch();
    }

    pub fn set_rtw_plan(&mut self, plan: RtwPlan) {
        self.rtw_plan = Some(plan);
        self.touch();
    }

    /// Notes visible to everyone on the case
    pub fn general_notes(&self) -> impl Iterator<Item = &CaseNote> {
        self.notes.iter().filter(|n| n.kind == NoteKind::General)
    }

    /// Notes written by supervisors
    pub fn supervisor_notes(&self) -> impl Iterator<Item = &CaseNote> {
        self.notes.iter().filter(|n| n.kind == NoteKind::Supervisor)
    }

    /// Total number of child records owned by this case
    pub fn child_record_count(&self) -> usize {
        self.notes.len()
            + self.documents.len()
            + self.communications.len()
            + self.stakeholders.len()
            + usize::from(self.rtw_plan.is_some())
    }

    /// Whole weeks elapsed since the injury date, counting the first week as 1
    pub fn weeks_since_injury(&self, today: NaiveDate) -> u32 {
        let days = (today - self.injury.date).num_days().max(0);
        (days / 7) as u32 + 1
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Checks if transition is valid
    fn can_transition_to(&self, target: CaseStatus) -> bool {
        use CaseStatus::*;
        matches!(
            (self.status, target),
            (New, Active) |
            (New, Closed) |
            (Active, OnHold) |
            (OnHold, Active) |
            (Active, ReturnedToWork) |
            (ReturnedToWork, Active) |
            (ReturnedToWork, Closed) |
            (Active, Closed) |
            (OnHold, Closed) |
            (Closed, Reopened) |
            (Reopened, Active)
        )
    }
}
