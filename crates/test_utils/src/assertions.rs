//! Custom Test Assertions
//!
//! Assertion helpers for domain types with more useful failure messages
//! than plain `assert_eq!`.

use domain_cases::{Case, CaseError, HoursSchedule, RtwPlan};
use rust_decimal::Decimal;

/// Asserts week totals for weeks 1 to 4 of a schedule
///
/// # Panics
///
/// Panics naming the first week whose total differs
pub fn assert_week_totals(schedule: &HoursSchedule, expected: [Decimal; 4]) {
    for (index, want) in expected.iter().enumerate() {
        let week = index as u8 + 1;
        let got = schedule.week_total(week);
        assert_eq!(
            got, *want,
            "Week {} total mismatch: actual={}, expected={}",
            week, got, want
        );
    }
}

/// Asserts that printing the plan is blocked on exactly `missing`
pub fn assert_print_blocked(plan: &RtwPlan, case: &Case, missing: &[&str]) {
    match plan.render_printable(case) {
        Err(CaseError::IncompletePlan { missing: actual }) => {
            let actual: Vec<&str> = actual.iter().map(String::as_str).collect();
            assert_eq!(actual, missing, "Unexpected missing fields");
        }
        Ok(_) => panic!("Expected printing to be blocked on {:?}, but it succeeded", missing),
        Err(other) => panic!("Expected IncompletePlan, got {:?}", other),
    }
}

/// Asserts that no child records remain on an in-memory case value
pub fn assert_no_children(case: &Case) {
    assert_eq!(
        case.child_record_count(),
        0,
        "Case {} still has {} child records",
        case.id,
        case.child_record_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{TestCaseBuilder, TestPlanBuilder};
    use rust_decimal_macros::dec;

    #[test]
    fn test_assert_week_totals_passes() {
        let schedule = HoursSchedule::default();
        assert_week_totals(&schedule, [dec!(20), dec!(30), dec!(36), dec!(40)]);
    }

    #[test]
    #[should_panic(expected = "Week 1 total mismatch")]
    fn test_assert_week_totals_fails() {
        let schedule = HoursSchedule::default();
        assert_week_totals(&schedule, [dec!(1), dec!(30), dec!(36), dec!(40)]);
    }

    #[test]
    fn test_assert_print_blocked() {
        let case = TestCaseBuilder::new().build();
        let plan = TestPlanBuilder::complete_for(&case).without_treating_practitioner().build();
        assert_print_blocked(&plan, &case, &["treating_practitioner"]);
    }
}
