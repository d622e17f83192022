//! Property-Based Test Generators
//!
//! Proptest strategies that produce data satisfying domain invariants.

use domain_cases::CaseStatus;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-blank claim numbers like `WC-2024-004211`
pub fn claim_number_strategy() -> impl Strategy<Value = String> {
    (2000u32..2100, 0u32..1_000_000).prop_map(|(year, seq)| format!("WC-{year}-{seq:06}"))
}

/// Strategy for plausible base daily hours, whole or half hours up to 12
pub fn daily_hours_strategy() -> impl Strategy<Value = Decimal> {
    (2u32..=24).prop_map(|half_hours| Decimal::from(half_hours) / Decimal::from(2))
}

/// Strategy for weekly earnings in dollars and cents
pub fn weekly_earnings_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..500_000).prop_map(|cents| Decimal::new(cents, 2)), 1..52)
}

pub fn case_status_strategy() -> impl Strategy<Value = CaseStatus> {
    prop_oneof![
        Just(CaseStatus::New),
        Just(CaseStatus::Active),
        Just(CaseStatus::OnHold),
        Just(CaseStatus::ReturnedToWork),
        Just(CaseStatus::Closed),
        Just(CaseStatus::Reopened),
    ]
}

/// Strategy for plan completions naming a daily hours figure, returned with
/// that figure
pub fn plan_response_strategy() -> impl Strategy<Value = (String, Decimal)> {
    (daily_hours_strategy(), prop::sample::select(vec!["hours", "hrs", "hour"])).prop_map(
        |(hours, unit)| {
            let text = format!(
                "Suitable duties:\n- Filing\nRestrictions:\n- No lifting\nHours schedule:\n- {} {} per day\n",
                hours.normalize(),
                unit
            );
            (text, hours)
        },
    )
}
