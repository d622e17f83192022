//! Tests for the case aggregate, child records and RTW plans

use chrono::{Days, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::ProfileId;

use domain_cases::case::{Case, CaseStatus, Employer, Injury, Worker};
use domain_cases::communication::{Communication, CommunicationChannel, Direction};
use domain_cases::document::{Document, DocumentCategory};
use domain_cases::error::CaseError;
use domain_cases::note::{CaseNote, NoteKind};
use domain_cases::rtw_plan::{HoursSchedule, PlanStatus, RtwPlan, SuggestedFields, DEFAULT_PROGRESSION};
use domain_cases::stakeholder::{Stakeholder, StakeholderRole};

fn create_test_case() -> Case {
    let injury_date = Utc::now().date_naive() - Days::new(21);
    Case::open(
        "WC-2024-0001",
        Worker::new("Alex", "Nguyen"),
        Employer::new("Harbour Freight Pty Ltd"),
        Injury::new(injury_date, "Shoulder strain lifting cartons"),
        ProfileId::new_v7(),
    )
    .unwrap()
}

fn complete_plan(case: &Case) -> RtwPlan {
    let mut plan = RtwPlan::draft(case.id);
    plan.goal = "Return to full pre-injury duties".to_string();
    plan.start_date = NaiveDate::from_ymd_opt(2024, 5, 6);
    plan.review_date = NaiveDate::from_ymd_opt(2024, 6, 3);
    plan.suitable_duties = vec!["Stock control data entry".to_string()];
    plan.restrictions = vec!["No lifting above shoulder height".to_string()];
    plan.supervisor_name = "Priya Shah".to_string();
    plan.treating_practitioner = "Dr Mei Chen".to_string();
    plan
}

// ============================================================================
// Case Tests
// ============================================================================

mod case_tests {
    use super::*;

    #[test]
    fn test_case_open() {
        let case = create_test_case();

        assert_eq!(case.status, CaseStatus::New);
        assert_eq!(case.claim_number, "WC-2024-0001");
        assert!(case.documents.is_empty());
        assert!(case.rtw_plan.is_none());
        assert_eq!(case.child_record_count(), 0);
    }

    #[test]
    fn test_case_open_rejects_empty_claim_number() {
        let result = Case::open(
            "   ",
            Worker::new("Alex", "Nguyen"),
            Employer::new("Harbour Freight"),
            Injury::new(Utc::now().date_naive(), "Strain"),
            ProfileId::new(),
        );
        assert!(matches!(result, Err(CaseError::Validation(_))));
    }

    #[test]
    fn test_case_open_rejects_future_injury() {
        let result = Case::open(
            "WC-9",
            Worker::new("Alex", "Nguyen"),
            Employer::new("Harbour Freight"),
            Injury::new(Utc::now().date_naive() + Days::new(3), "Strain"),
            ProfileId::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_new_to_active() {
        let mut case = create_test_case();
        assert!(case.update_status(CaseStatus::Active).is_ok());
        assert_eq!(case.status, CaseStatus::Active);
    }

    #[test]
    fn test_status_new_to_returned_to_work_is_invalid() {
        let mut case = create_test_case();
        let err = case.update_status(CaseStatus::ReturnedToWork).unwrap_err();
        match err {
            CaseError::InvalidStatusTransition { from, to } => {
                assert_eq!(from, "new");
                assert_eq!(to, "returned_to_work");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_status_full_lifecycle() {
        let mut case = create_test_case();
        case.update_status(CaseStatus::Active).unwrap();
        case.update_status(CaseStatus::OnHold).unwrap();
        case.update_status(CaseStatus::Active).unwrap();
        case.update_status(CaseStatus::ReturnedToWork).unwrap();
        case.update_status(CaseStatus::Closed).unwrap();
        case.update_status(CaseStatus::Reopened).unwrap();
        assert!(case.update_status(CaseStatus::Active).is_ok());
    }

    #[test]
    fn test_closed_cannot_go_straight_to_active() {
        let mut case = create_test_case();
        case.update_status(CaseStatus::Active).unwrap();
        case.update_status(CaseStatus::Closed).unwrap();
        assert!(case.update_status(CaseStatus::Active).is_err());
    }

    #[test]
    fn test_assign_case_manager_replaces_single_manager() {
        let mut case = create_test_case();
        let new_manager = ProfileId::new_v7();
        case.assign_case_manager(new_manager);
        assert_eq!(case.case_manager_id, new_manager);
    }

    #[test]
    fn test_children_are_counted() {
        let mut case = create_test_case();
        let author = ProfileId::new();

        case.add_document(
            Document::new(case.id, "cert.pdf", "application/pdf", 10, DocumentCategory::MedicalCertificate, author).unwrap(),
        );
        case.add_communication(Communication::new(
            case.id,
            CommunicationChannel::Phone,
            Direction::Outbound,
            "Alex Nguyen",
            "Check-in",
            "Pain improving",
            author,
        ));
        case.add_note(CaseNote::new(case.id, NoteKind::General, author, "Called worker"));
        case.add_note(CaseNote::new(case.id, NoteKind::Supervisor, author, "Escalate if no progress"));
        case.add_stakeholder(Stakeholder::new(case.id, StakeholderRole::TreatingDoctor, "Dr Mei Chen"));
        case.set_rtw_plan(RtwPlan::draft(case.id));

        assert_eq!(case.child_record_count(), 6);
        assert_eq!(case.general_notes().count(), 1);
        assert_eq!(case.supervisor_notes().count(), 1);
    }

    #[test]
    fn test_case_serializes_status_snake_case() {
        let case = create_test_case();
        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(json["status"], "new");
    }
}

// ============================================================================
// RTW Plan Tests
// ============================================================================

mod rtw_plan_tests {
    use super::*;

    #[test]
    fn test_draft_plan_is_missing_plan_fields() {
        let case = create_test_case();
        let plan = RtwPlan::draft(case.id);

        let missing = plan.missing_required_fields(&case);
        assert_eq!(
            missing,
            vec![
                "goal",
                "start_date",
                "review_date",
                "suitable_duties",
                "restrictions",
                "supervisor_name",
                "treating_practitioner",
            ]
        );
        assert_eq!(plan.status, PlanStatus::Draft);
    }

    #[test]
    fn test_printing_blocked_until_all_required_fields_present() {
        let case = create_test_case();
        let mut plan = complete_plan(&case);
        plan.treating_practitioner = "  ".to_string();

        match plan.render_printable(&case) {
            Err(CaseError::IncompletePlan { missing }) => {
                assert_eq!(missing, vec!["treating_practitioner".to_string()]);
            }
            other => panic!("expected IncompletePlan, got {other:?}"),
        }

        plan.treating_practitioner = "Dr Mei Chen".to_string();
        let printable = plan.render_printable(&case).unwrap();
        assert!(printable.contains("Alex Nguyen"));
        assert!(printable.contains("WC-2024-0001"));
        assert!(printable.contains("No lifting above shoulder height"));
    }

    #[test]
    fn test_blank_list_entries_do_not_count() {
        let case = create_test_case();
        let mut plan = complete_plan(&case);
        plan.suitable_duties = vec!["   ".to_string()];
        assert_eq!(plan.missing_required_fields(&case), vec!["suitable_duties".to_string()]);
    }

    #[test]
    fn test_case_fields_are_required_too() {
        let mut case = create_test_case();
        case.employer.name = String::new();
        let plan = complete_plan(&case);
        assert!(!plan.is_complete(&case));
        assert_eq!(plan.missing_required_fields(&case), vec!["employer_name".to_string()]);
    }

    #[test]
    fn test_schedule_progression_from_twenty_hours() {
        let schedule = HoursSchedule::from_base_hours(dec!(20), &DEFAULT_PROGRESSION);

        assert_eq!(schedule.week_total(1), dec!(50));
        assert_eq!(schedule.week_total(2), dec!(75));
        assert_eq!(schedule.week_total(3), dec!(90));
        assert_eq!(schedule.week_total(4), dec!(100));
        assert_eq!(schedule.weeks[0].days[0].hours, dec!(10));
    }

    #[test]
    fn test_apply_suggestion_replaces_schedule() {
        let case = create_test_case();
        let mut plan = RtwPlan::draft(case.id);
        plan.apply_suggestion(&SuggestedFields {
            suitable_duties: vec!["Filing".to_string()],
            duties_to_avoid: vec!["Forklift driving".to_string()],
            restrictions: vec!["Seated work only".to_string()],
            schedule: Some(HoursSchedule::from_base_hours(dec!(6), &DEFAULT_PROGRESSION)),
        });

        assert_eq!(plan.duties_to_avoid, vec!["Forklift driving".to_string()]);
        assert_eq!(plan.schedule.base_daily_hours, dec!(6));
    }
}

proptest! {
    #[test]
    fn prop_final_week_is_five_full_days(base in 1u32..=12) {
        let base = Decimal::from(base);
        let schedule = HoursSchedule::from_base_hours(base, &DEFAULT_PROGRESSION);
        prop_assert_eq!(schedule.week_total(4), base * dec!(5));
        prop_assert!(schedule.week_total(1) < schedule.week_total(2));
        prop_assert!(schedule.week_total(3) < schedule.week_total(4));
    }
}
