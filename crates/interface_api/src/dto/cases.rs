//! Case DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{CaseId, ProfileId};
use domain_cases::{Case, CasePriority, CaseStatus, Employer, Injury, Worker};

#[derive(Debug, Deserialize, Validate)]
pub struct WorkerInput {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub occupation: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<WorkerInput> for Worker {
    fn from(input: WorkerInput) -> Self {
        Worker {
            email: input.email,
            phone: input.phone,
            occupation: input.occupation,
            date_of_birth: input.date_of_birth,
            ..Worker::new(input.first_name, input.last_name)
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmployerInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<EmployerInput> for Employer {
    fn from(input: EmployerInput) -> Self {
        Employer {
            contact_name: input.contact_name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            ..Employer::new(input.name)
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct InjuryInput {
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub body_part: Option<String>,
    pub injury_type: Option<String>,
    pub mechanism: Option<String>,
}

impl From<InjuryInput> for Injury {
    fn from(input: InjuryInput) -> Self {
        Injury {
            body_part: input.body_part,
            injury_type: input.injury_type,
            mechanism: input.mechanism,
            ..Injury::new(input.date, input.description)
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCaseRequest {
    #[validate(length(min = 1, max = 64))]
    pub claim_number: String,
    #[validate(nested)]
    pub worker: WorkerInput,
    #[validate(nested)]
    pub employer: EmployerInput,
    #[validate(nested)]
    pub injury: InjuryInput,
    /// Defaults to the creating user
    pub case_manager_id: Option<Uuid>,
    pub priority: Option<CasePriority>,
}

/// Replaces whichever sections are present
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCaseRequest {
    #[validate(nested)]
    pub worker: Option<WorkerInput>,
    #[validate(nested)]
    pub employer: Option<EmployerInput>,
    #[validate(nested)]
    pub injury: Option<InjuryInput>,
    pub priority: Option<CasePriority>,
}

impl UpdateCaseRequest {
    pub fn apply_to(self, case: &mut Case) {
        if let Some(worker) = self.worker {
            case.worker = worker.into();
        }
        if let Some(employer) = self.employer {
            case.employer = employer.into();
        }
        if let Some(injury) = self.injury {
            case.injury = injury.into();
        }
        if let Some(priority) = self.priority {
            case.priority = priority;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: CaseStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignCaseManagerRequest {
    pub case_manager_id: Uuid,
}

/// One row of the case list
#[derive(Debug, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: CaseId,
    pub claim_number: String,
    pub worker_name: String,
    pub employer_name: String,
    pub status: CaseStatus,
    pub priority: CasePriority,
    pub case_manager_id: ProfileId,
    pub injury_date: NaiveDate,
    pub has_rtw_plan: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&Case> for CaseSummary {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id,
            claim_number: case.claim_number.clone(),
            worker_name: case.worker.full_name(),
            employer_name: case.employer.name.clone(),
            status: case.status,
            priority: case.priority,
            case_manager_id: case.case_manager_id,
            injury_date: case.injury.date,
            has_rtw_plan: case.rtw_plan.is_some(),
            updated_at: case.updated_at,
        }
    }
}

/// `stale` is set when the data came from the local cache because the
/// backend was slow or unreachable
#[derive(Debug, Serialize, Deserialize)]
pub struct CaseListResponse {
    pub cases: Vec<CaseSummary>,
    pub stale: bool,
}

#[derive(Debug, Serialize)]
pub struct CaseDetailResponse {
    #[serde(flatten)]
    pub case: Case,
    pub stale: bool,
}
