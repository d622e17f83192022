//! Test Data Builders
//!
//! Builders let tests set only the fields they care about.

use chrono::NaiveDate;
use core_kernel::ProfileId;
use domain_cases::{
    Case, CasePriority, CaseStatus, Compensation, Employer, HoursSchedule, Injury, PlanStatus,
    RtwPlan, Worker, DEFAULT_PROGRESSION,
};
use rust_decimal::Decimal;

use crate::fixtures::{DateFixtures, PartyFixtures};

/// Builder for constructing test cases
pub struct TestCaseBuilder {
    claim_number: String,
    worker: Worker,
    employer: Employer,
    injury: Injury,
    case_manager_id: ProfileId,
    status: CaseStatus,
    priority: CasePriority,
    weekly_earnings: Vec<Decimal>,
}

impl Default for TestCaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCaseBuilder {
    pub fn new() -> Self {
        Self {
            claim_number: format!("WC-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
            worker: PartyFixtures::worker(),
            employer: PartyFixtures::employer(),
            injury: PartyFixtures::injury(),
            case_manager_id: ProfileId::new_v7(),
            status: CaseStatus::New,
            priority: CasePriority::default(),
            weekly_earnings: Vec::new(),
        }
    }

    pub fn with_claim_number(mut self, claim_number: impl Into<String>) -> Self {
        self.claim_number = claim_number.into();
        self
    }

    pub fn with_worker(mut self, first_name: &str, last_name: &str) -> Self {
        self.worker = Worker::new(first_name, last_name);
        self
    }

    pub fn with_employer(mut self, name: &str) -> Self {
        self.employer = Employer::new(name);
        self
    }

    pub fn with_injury_date(mut self, date: NaiveDate) -> Self {
        self.injury.date = date;
        self
    }

    pub fn with_case_manager(mut self, id: ProfileId) -> Self {
        self.case_manager_id = id;
        self
    }

    /// Walks the case through valid transitions to `status` after opening
    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: CasePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_weekly_earnings(mut self, earnings: Vec<Decimal>) -> Self {
        self.weekly_earnings = earnings;
        self
    }

    /// Builds the case
    ///
    /// # Panics
    ///
    /// Panics if the configured data does not form a valid case
    pub fn build(self) -> Case {
        let mut case = Case::open(
            self.claim_number,
            self.worker,
            self.employer,
            self.injury,
            self.case_manager_id,
        )
        .expect("builder produced an invalid case");
        case.priority = self.priority;

        let path: &[CaseStatus] = match self.status {
            CaseStatus::New => &[],
            CaseStatus::Active => &[CaseStatus::Active],
            CaseStatus::OnHold => &[CaseStatus::Active, CaseStatus::OnHold],
            CaseStatus::ReturnedToWork => &[CaseStatus::Active, CaseStatus::ReturnedToWork],
            CaseStatus::Closed => &[CaseStatus::Active, CaseStatus::Closed],
            CaseStatus::Reopened => &[CaseStatus::Active, CaseStatus::Closed, CaseStatus::Reopened],
        };
        for status in path {
            case.update_status(*status).expect("status path is valid");
        }

        if !self.weekly_earnings.is_empty() {
            let mut compensation = Compensation::with_earnings(self.weekly_earnings);
            compensation.calculate_piawe().expect("valid weekly earnings");
            case.compensation = compensation;
        }
        case
    }
}

/// Builder for RTW plans; starts complete so tests remove what they need
pub struct TestPlanBuilder {
    plan: RtwPlan,
}

impl TestPlanBuilder {
    /// A plan for `case` with every required field filled in
    pub fn complete_for(case: &Case) -> Self {
        let mut plan = RtwPlan::draft(case.id);
        plan.goal = "Return to pre-injury duties within four weeks".to_string();
        plan.start_date = Some(DateFixtures::plan_start());
        plan.review_date = Some(DateFixtures::plan_review());
        plan.suitable_duties = vec!["Seated stock control".to_string()];
        plan.duties_to_avoid = vec!["Overhead lifting".to_string()];
        plan.restrictions = vec!["Maximum lift 5kg".to_string()];
        plan.supervisor_name = "Priya Shah".to_string();
        plan.treating_practitioner = "Dr Mei Chen".to_string();
        Self { plan }
    }

    pub fn draft_for(case: &Case) -> Self {
        Self { plan: RtwPlan::draft(case.id) }
    }

    pub fn with_status(mut self, status: PlanStatus) -> Self {
        self.plan.status = status;
        self
    }

    pub fn with_base_hours(mut self, hours: Decimal) -> Self {
        self.plan.schedule = HoursSchedule::from_base_hours(hours, &DEFAULT_PROGRESSION);
        self
    }

    pub fn without_treating_practitioner(mut self) -> Self {
        self.plan.treating_practitioner.clear();
        self
    }

    pub fn build(self) -> RtwPlan {
        self.plan
    }
}
