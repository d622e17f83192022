//! People and organisations involved in a case

use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, StakeholderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderRole {
    TreatingDoctor,
    EmployerContact,
    Insurer,
    RehabProvider,
    Physiotherapist,
    Psychologist,
    Lawyer,
    Other,
}

impl StakeholderRole {
    pub fn label(&self) -> &'static str {
        match self {
            StakeholderRole::TreatingDoctor => "Treating doctor",
            StakeholderRole::EmployerContact => "Employer contact",
            StakeholderRole::Insurer => "Insurer",
            StakeholderRole::RehabProvider => "Rehabilitation provider",
            StakeholderRole::Physiotherapist => "Physiotherapist",
            StakeholderRole::Psychologist => "Psychologist",
            StakeholderRole::Lawyer => "Lawyer",
            StakeholderRole::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: StakeholderId,
    pub case_id: CaseId,
    pub role: StakeholderRole,
    pub name: String,
    pub organisation: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Stakeholder {
    pub fn new(case_id: CaseId, role: StakeholderRole, name: impl Into<String>) -> Self {
        Self {
            id: StakeholderId::new_v7(),
            case_id,
            role,
            name: name.into(),
            organisation: None,
            phone: None,
            email: None,
        }
    }
}
