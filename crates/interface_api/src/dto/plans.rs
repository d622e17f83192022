//! RTW plan and compensation DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use domain_cases::{HoursSchedule, PlanStatus, RtwPlan, DEFAULT_PROGRESSION};

fn validate_daily_hours(hours: &Decimal) -> Result<(), ValidationError> {
    if hours.is_sign_positive() && !hours.is_zero() && *hours <= Decimal::from(24) {
        Ok(())
    } else {
        Err(ValidationError::new("daily_hours_range"))
    }
}

fn validate_earnings(earnings: &[Decimal]) -> Result<(), ValidationError> {
    if earnings.iter().any(|w| w.is_sign_negative()) {
        return Err(ValidationError::new("negative_earnings"));
    }
    Ok(())
}

/// Partial update of the case's RTW plan; absent fields are left alone
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_plan_dates"))]
pub struct SavePlanRequest {
    pub status: Option<PlanStatus>,
    #[validate(length(max = 2000))]
    pub goal: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub review_date: Option<NaiveDate>,
    pub suitable_duties: Option<Vec<String>>,
    pub duties_to_avoid: Option<Vec<String>>,
    pub restrictions: Option<Vec<String>>,
    /// Rebuilds the four-week schedule from this base
    #[validate(custom(function = "validate_daily_hours"))]
    pub base_daily_hours: Option<Decimal>,
    #[validate(length(max = 200))]
    pub supervisor_name: Option<String>,
    #[validate(length(max = 200))]
    pub treating_practitioner: Option<String>,
    pub notes: Option<String>,
}

fn validate_plan_dates(request: &SavePlanRequest) -> Result<(), ValidationError> {
    match (request.start_date, request.review_date) {
        (Some(start), Some(review)) if review < start => {
            Err(ValidationError::new("review_before_start"))
        }
        _ => Ok(()),
    }
}

impl SavePlanRequest {
    pub fn apply_to(self, plan: &mut RtwPlan) {
        if let Some(status) = self.status {
            plan.status = status;
        }
        if let Some(goal) = self.goal {
            plan.goal = goal;
        }
        if self.start_date.is_some() {
            plan.start_date = self.start_date;
        }
        if self.review_date.is_some() {
            plan.review_date = self.review_date;
        }
        if let Some(duties) = self.suitable_duties {
            plan.suitable_duties = duties;
        }
        if let Some(avoid) = self.duties_to_avoid {
            plan.duties_to_avoid = avoid;
        }
        if let Some(restrictions) = self.restrictions {
            plan.restrictions = restrictions;
        }
        if let Some(base) = self.base_daily_hours {
            plan.schedule = HoursSchedule::from_base_hours(base, &DEFAULT_PROGRESSION);
        }
        if let Some(name) = self.supervisor_name {
            plan.supervisor_name = name;
        }
        if let Some(name) = self.treating_practitioner {
            plan.treating_practitioner = name;
        }
        if self.notes.is_some() {
            plan.notes = self.notes;
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanValidationResponse {
    pub complete: bool,
    pub missing: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompensationRequest {
    #[validate(length(min = 1, max = 52), custom(function = "validate_earnings"))]
    pub weekly_earnings: Vec<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompensationResponse {
    pub piawe: Decimal,
    pub weekly_earnings: Vec<Decimal>,
    pub weeks_since_injury: u32,
    /// Zero once the entitlement period has run out
    pub weekly_entitlement: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::CaseId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_daily_hours_range() {
        let request = SavePlanRequest { base_daily_hours: Some(dec!(30)), ..Default::default() };
        assert!(request.validate().is_err());

        let request = SavePlanRequest { base_daily_hours: Some(dec!(7.5)), ..Default::default() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_review_before_start_is_rejected() {
        let request = SavePlanRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            review_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut plan = RtwPlan::draft(CaseId::new());
        plan.goal = "Full duties".to_string();

        SavePlanRequest {
            restrictions: Some(vec!["No ladders".to_string()]),
            base_daily_hours: Some(dec!(6)),
            ..Default::default()
        }
        .apply_to(&mut plan);

        assert_eq!(plan.goal, "Full duties");
        assert_eq!(plan.restrictions, vec!["No ladders".to_string()]);
        assert_eq!(plan.schedule.base_daily_hours, dec!(6));
    }
}
