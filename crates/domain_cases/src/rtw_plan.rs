//! Return-to-work plans
//!
//! A plan records what the worker can and cannot do while recovering, plus a
//! graduated four-week hours schedule. Before a plan can be printed every
//! required field must be filled in.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, PlanId};
use crate::case::Case;
use crate::error::CaseError;

/// Percentage of base daily hours worked in weeks 1 through 4.
///
/// Placeholder business rule pending product confirmation.
pub const DEFAULT_PROGRESSION: [u8; 4] = [50, 75, 90, 100];

/// Base daily hours assumed when none are known
pub const DEFAULT_DAILY_HOURS: Decimal = dec!(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

/// Working days covered by a schedule week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl WorkDay {
    pub const ALL: [WorkDay; 5] = [
        WorkDay::Monday,
        WorkDay::Tuesday,
        WorkDay::Wednesday,
        WorkDay::Thursday,
        WorkDay::Friday,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            WorkDay::Monday => "Mon",
            WorkDay::Tuesday => "Tue",
            WorkDay::Wednesday => "Wed",
            WorkDay::Thursday => "Thu",
            WorkDay::Friday => "Fri",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub day: WorkDay,
    pub hours: Decimal,
}

/// One week of a graduated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSchedule {
    /// 1-based week number
    pub week: u8,
    /// Share of base daily hours, in percent
    pub percentage: u8,
    pub days: [DayHours; 5],
}

impl WeekSchedule {
    pub fn total(&self) -> Decimal {
        self.days.iter().map(|d| d.hours).sum()
    }
}

/// Four-week graduated Monday–Friday hours schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursSchedule {
    pub base_daily_hours: Decimal,
    pub weeks: Vec<WeekSchedule>,
}

impl HoursSchedule {
    /// Builds a schedule that scales `base_daily_hours` by each week's percentage
    pub fn from_base_hours(base_daily_hours: Decimal, progression: &[u8]) -> Self {
        let weeks = progression
            .iter()
            .enumerate()
            .map(|(i, pct)| {
                let hours = (base_daily_hours * Decimal::from(*pct) / dec!(100)).round_dp(2);
                WeekSchedule {
                    week: (i + 1) as u8,
                    percentage: *pct,
                    days: WorkDay::ALL.map(|day| DayHours { day, hours }),
                }
            })
            .collect();

        Self {
            base_daily_hours,
            weeks,
        }
    }

    /// Total hours in the given 1-based week, or zero when out of range
    pub fn week_total(&self, week: u8) -> Decimal {
        self.weeks
            .iter()
            .find(|w| w.week == week)
            .map(WeekSchedule::total)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.weeks.iter().map(WeekSchedule::total).sum()
    }
}

impl Default for HoursSchedule {
    fn default() -> Self {
        Self::from_base_hours(DEFAULT_DAILY_HOURS, &DEFAULT_PROGRESSION)
    }
}

/// Plan fields proposed by AI guidance, ready to be merged into a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFields {
    pub suitable_duties: Vec<String>,
    pub duties_to_avoid: Vec<String>,
    pub restrictions: Vec<String>,
    pub schedule: Option<HoursSchedule>,
}

/// A return-to-work plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtwPlan {
    pub id: PlanId,
    pub case_id: CaseId,
    pub status: PlanStatus,
    pub goal: String,
    pub start_date: Option<NaiveDate>,
    pub review_date: Option<NaiveDate>,
    pub suitable_duties: Vec<String>,
    pub duties_to_avoid: Vec<String>,
    pub restrictions: Vec<String>,
    pub schedule: HoursSchedule,
    pub supervisor_name: String,
    pub treating_practitioner: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RtwPlan {
    /// Creates an empty draft plan for a case
    pub fn draft(case_id: CaseId) -> Self {
        let now = Utc::now();
        Self {
            id: PlanId::new_v7(),
            case_id,
            status: PlanStatus::Draft,
            goal: String::new(),
            start_date: None,
            review_date: None,
            suitable_duties: Vec::new(),
            duties_to_avoid: Vec::new(),
            restrictions: Vec::new(),
            schedule: HoursSchedule::default(),
            supervisor_name: String::new(),
            treating_practitioner: String::new(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges suggested fields; empty suggestions leave existing values alone
    pub fn apply_suggestion(&mut self, suggestion: &SuggestedFields) {
        if !suggestion.suitable_duties.is_empty() {
            self.suitable_duties = suggestion.suitable_duties.clone();
        }
        if !suggestion.duties_to_avoid.is_empty() {
            self.duties_to_avoid = suggestion.duties_to_avoid.clone();
        }
        if !suggestion.restrictions.is_empty() {
            self.restrictions = suggestion.restrictions.clone();
        }
        if let Some(schedule) = &suggestion.schedule {
            self.schedule = schedule.clone();
        }
        self.updated_at = Utc::now();
    }

    /// Lists the required fields that are still empty
    ///
    /// Worker name, claim number and employer come from the owning case.
    pub fn missing_required_fields(&self, case: &Case) -> Vec<String> {
        let mut missing = Vec::new();
        let mut require = |present: bool, name: &str| {
            if !present {
                missing.push(name.to_string());
            }
        };

        require(!case.worker.full_name().is_empty(), "worker_name");
        require(!case.claim_number.trim().is_empty(), "claim_number");
        require(!case.employer.name.trim().is_empty(), "employer_name");
        require(!self.goal.trim().is_empty(), "goal");
        require(self.start_date.is_some(), "start_date");
        require(self.review_date.is_some(), "review_date");
        require(has_entries(&self.suitable_duties), "suitable_duties");
        require(has_entries(&self.restrictions), "restrictions");
        require(!self.supervisor_name.trim().is_empty(), "supervisor_name");
        require(!self.treating_practitioner.trim().is_empty(), "treating_practitioner");

        missing
    }

    /// Rejects a review date that falls before the start date
    pub fn check_dates(&self) -> Result<(), CaseError> {
        match (self.start_date, self.review_date) {
            (Some(start), Some(review)) if review < start => Err(CaseError::validation(format!(
                "Review date {review} is before start date {start}"
            ))),
            _ => Ok(()),
        }
    }

    pub fn is_complete(&self, case: &Case) -> bool {
        self.missing_required_fields(case).is_empty()
    }

    /// Renders the plan as printable text
    ///
    /// # Errors
    ///
    /// Returns `CaseError::IncompletePlan` listing every missing field.
    pub fn render_printable(&self, case: &Case) -> Result<String, CaseError> {
        let missing = self.missing_required_fields(case);
        if !missing.is_empty() {
            return Err(CaseError::IncompletePlan { missing });
        }

        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "RETURN TO WORK PLAN");
        let _ = writeln!(out, "===================");
        let _ = writeln!(out, "Worker:          {}", case.worker.full_name());
        let _ = writeln!(out, "Claim number:    {}", case.claim_number);
        let _ = writeln!(out, "Employer:        {}", case.employer.name);
        let _ = writeln!(out, "Injury date:     {}", case.injury.date);
        if let (Some(start), Some(review)) = (self.start_date, self.review_date) {
            let _ = writeln!(out, "Plan period:     {} to {}", start, review);
        }
        let _ = writeln!(out, "Supervisor:      {}", self.supervisor_name);
        let _ = writeln!(out, "Practitioner:    {}", self.treating_practitioner);
        let _ = writeln!(out);
        let _ = writeln!(out, "Goal");
        let _ = writeln!(out, "  {}", self.goal.trim());

        write_list(&mut out, "Suitable duties", &self.suitable_duties);
        write_list(&mut out, "Duties to avoid", &self.duties_to_avoid);
        write_list(&mut out, "Restrictions", &self.restrictions);

        let _ = writeln!(out);
        let _ = writeln!(out, "Hours schedule");
        let header: Vec<&str> = WorkDay::ALL.iter().map(WorkDay::short_name).collect();
        let _ = writeln!(out, "  Week  %    {}  Total", header.join("   "));
        for week in &self.schedule.weeks {
            let days: Vec<String> = week.days.iter().map(|d| format!("{:>4}", d.hours.normalize().to_string())).collect();
            let _ = writeln!(
                out,
                "  {:<4}  {:<3}  {}  {}",
                week.week,
                week.percentage,
                days.join("  "),
                week.total().normalize()
            );
        }

        if let Some(notes) = self.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            let _ = writeln!(out);
            let _ = writeln!(out, "Notes");
            let _ = writeln!(out, "  {}", notes.trim());
        }

        Ok(out)
    }
}

fn has_entries(items: &[String]) -> bool {
    items.iter().any(|i| !i.trim().is_empty())
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title);
    if items.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_uses_default_hours() {
        let schedule = HoursSchedule::default();
        assert_eq!(schedule.weeks.len(), 4);
        assert_eq!(schedule.week_total(1), dec!(20));
        assert_eq!(schedule.week_total(4), dec!(40));
    }

    #[test]
    fn test_week_total_out_of_range() {
        assert_eq!(HoursSchedule::default().week_total(9), Decimal::ZERO);
    }

    #[test]
    fn test_apply_suggestion_keeps_existing_when_empty() {
        let mut plan = RtwPlan::draft(CaseId::new());
        plan.restrictions = vec!["No lifting over 5kg".to_string()];

        plan.apply_suggestion(&SuggestedFields {
            suitable_duties: vec!["Reception".to_string()],
            ..Default::default()
        });

        assert_eq!(plan.suitable_duties, vec!["Reception".to_string()]);
        assert_eq!(plan.restrictions, vec!["No lifting over 5kg".to_string()]);
    }

    #[test]
    fn test_check_dates_rejects_review_before_start() {
        let mut plan = RtwPlan::draft(CaseId::new());
        plan.review_date = NaiveDate::from_ymd_opt(2024, 4, 1);
        assert!(plan.check_dates().is_ok());

        plan.start_date = NaiveDate::from_ymd_opt(2024, 4, 8);
        assert!(matches!(plan.check_dates(), Err(CaseError::Validation(_))));

        plan.review_date = NaiveDate::from_ymd_opt(2024, 4, 8);
        assert!(plan.check_dates().is_ok());
    }
}
