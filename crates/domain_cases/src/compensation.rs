//! Compensation and PIAWE figures
//!
//! PIAWE (pre-injury average weekly earnings) is the basis for weekly
//! compensation. Entitlement steps down over the life of the claim.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CaseError;

/// Weeks paid at the first-tier rate
pub const FIRST_ENTITLEMENT_PERIOD_WEEKS: u32 = 13;
/// Last week with any weekly entitlement
pub const SECOND_ENTITLEMENT_PERIOD_WEEKS: u32 = 130;

const FIRST_PERIOD_RATE: Decimal = dec!(0.95);
const SECOND_PERIOD_RATE: Decimal = dec!(0.80);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    /// Pre-injury average weekly earnings, once determined
    pub piawe: Option<Decimal>,
    /// Gross weekly earnings over the relevant pre-injury period
    pub weekly_earnings: Vec<Decimal>,
}

impl Compensation {
    pub fn with_earnings(weekly_earnings: Vec<Decimal>) -> Self {
        Self {
            piawe: None,
            weekly_earnings,
        }
    }

    /// Averages the recorded weekly earnings and stores the result as PIAWE
    ///
    /// # Errors
    ///
    /// Returns `CaseError::Validation` when no earnings are recorded or any
    /// week is negative.
    pub fn calculate_piawe(&mut self) -> Result<Decimal, CaseError> {
        if self.weekly_earnings.is_empty() {
            return Err(CaseError::validation("No weekly earnings recorded"));
        }
        if self.weekly_earnings.iter().any(|w| w.is_sign_negative()) {
            return Err(CaseError::validation("Weekly earnings cannot be negative"));
        }

        let total: Decimal = self.weekly_earnings.iter().copied().sum();
        let piawe = (total / Decimal::from(self.weekly_earnings.len())).round_dp(2);
        self.piawe = Some(piawe);
        Ok(piawe)
    }

    /// Weekly compensation owed in the given week of incapacity (1-based)
    ///
    /// Returns `None` until PIAWE has been determined.
    pub fn weekly_entitlement(&self, weeks_since_injury: u32) -> Option<Decimal> {
        let piawe = self.piawe?;
        let rate = match weeks_since_injury {
            0..=FIRST_ENTITLEMENT_PERIOD_WEEKS => FIRST_PERIOD_RATE,
            w if w <= SECOND_ENTITLEMENT_PERIOD_WEEKS => SECOND_PERIOD_RATE,
            _ => Decimal::ZERO,
        };
        Some((piawe * rate).round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piawe_is_mean_of_earnings() {
        let mut comp = Compensation::with_earnings(vec![dec!(1000), dec!(1200), dec!(1100)]);
        assert_eq!(comp.calculate_piawe().unwrap(), dec!(1100));
        assert_eq!(comp.piawe, Some(dec!(1100)));
    }

    #[test]
    fn test_step_down() {
        let comp = Compensation {
            piawe: Some(dec!(1000)),
            weekly_earnings: vec![],
        };
        assert_eq!(comp.weekly_entitlement(1), Some(dec!(950)));
        assert_eq!(comp.weekly_entitlement(13), Some(dec!(950)));
        assert_eq!(comp.weekly_entitlement(14), Some(dec!(800)));
        assert_eq!(comp.weekly_entitlement(130), Some(dec!(800)));
        assert_eq!(comp.weekly_entitlement(131), Some(Decimal::ZERO));
    }

    #[test]
    fn test_entitlement_requires_piawe() {
        assert_eq!(Compensation::default().weekly_entitlement(1), None);
    }

    #[test]
    fn test_empty_earnings_rejected() {
        assert!(Compensation::default().calculate_piawe().is_err());
    }
}
