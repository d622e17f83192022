//! Pre-built Test Fixtures
//!
//! Consistent, predictable test data for unit and integration tests.

use chrono::{Days, NaiveDate, Utc};
use core_kernel::ProfileId;
use domain_cases::{Employer, Injury, Profile, Role, Worker};

/// Fixture for user profiles, one per role
pub struct ProfileFixtures;

impl ProfileFixtures {
    pub fn admin() -> Profile {
        Profile::new(ProfileId::new_v7(), "Morgan Admin", "admin@rtw.test", Role::Admin)
    }

    pub fn supervisor() -> Profile {
        Profile::new(ProfileId::new_v7(), "Riley Supervisor", "supervisor@rtw.test", Role::Supervisor)
    }

    pub fn case_manager() -> Profile {
        Profile::new(ProfileId::new_v7(), "Casey Manager", "manager@rtw.test", Role::CaseManager)
    }
}

/// Fixture for dates relative to today
pub struct DateFixtures;

impl DateFixtures {
    /// An injury date three weeks ago
    pub fn recent_injury() -> NaiveDate {
        Utc::now().date_naive() - Days::new(21)
    }

    /// An injury date twenty weeks ago, inside the second entitlement period
    pub fn older_injury() -> NaiveDate {
        Utc::now().date_naive() - Days::new(140)
    }

    pub fn plan_start() -> NaiveDate {
        Utc::now().date_naive() + Days::new(7)
    }

    pub fn plan_review() -> NaiveDate {
        Utc::now().date_naive() + Days::new(35)
    }
}

/// Fixture for case parties
pub struct PartyFixtures;

impl PartyFixtures {
    pub fn worker() -> Worker {
        let mut worker = Worker::new("Alex", "Nguyen");
        worker.occupation = Some("Warehouse storeperson".to_string());
        worker.phone = Some("0400 000 000".to_string());
        worker
    }

    pub fn employer() -> Employer {
        let mut employer = Employer::new("Harbour Freight Pty Ltd");
        employer.contact_name = Some("Priya Shah".to_string());
        employer
    }

    pub fn injury() -> Injury {
        let mut injury = Injury::new(DateFixtures::recent_injury(), "Right shoulder strain lifting cartons");
        injury.body_part = Some("Right shoulder".to_string());
        injury.mechanism = Some("Lifting".to_string());
        injury
    }
}

/// Fixture for AI completion texts
pub struct CompletionFixtures;

impl CompletionFixtures {
    /// A well-formed plan response with all sections and 6 hours per day
    pub fn plan_response() -> &'static str {
        "Here is a suggested plan.\n\
         \n\
         Suitable duties and tasks:\n\
         - Stock count using a handheld scanner\n\
         - Label printing at a seated workstation\n\
         \n\
         Duties to avoid:\n\
         - Lifting above shoulder height\n\
         \n\
         Restrictions:\n\
         - Maximum lift 5kg\n\
         - 10 minute break every hour\n\
         \n\
         Hours schedule:\n\
         - Start at 6 hours per day\n\
         \n\
         Review and next steps:\n\
         - Review with GP after two weeks\n"
    }

    pub fn insights_response() -> &'static str {
        "Recovery is on track and the employer is engaged.\n\
         - Confirm suitable duties with the supervisor\n\
         - Book the two-week GP review\n"
    }
}
