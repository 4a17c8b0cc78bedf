use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{ParkingError, ParkingResult};

/// Reference tariff: one currency unit per minute.
pub const DEFAULT_RATE_PER_MINUTE: f64 = 1.0;

/// Shortest stay that is ever billed.
pub const MINIMUM_BILLABLE_MINUTES: i64 = 1;

/// Flat per-minute tariff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillingCalculator {
    rate_per_minute: f64,
}

impl BillingCalculator {
    pub fn new(rate_per_minute: f64) -> ParkingResult<Self> {
        if !rate_per_minute.is_finite() || rate_per_minute < 0.0 {
            return Err(ParkingError::ValidationError(format!(
                "rate per minute must be a non-negative number, got {}",
                rate_per_minute
            )));
        }
        Ok(Self { rate_per_minute })
    }

    pub fn rate_per_minute(&self) -> f64 {
        self.rate_per_minute
    }

    /// Whole minutes between entry and exit, floored, never below the minimum.
    pub fn billable_minutes(&self, entry: NaiveDateTime, exit: NaiveDateTime) -> i64 {
        (exit - entry).num_minutes().max(MINIMUM_BILLABLE_MINUTES)
    }

    /// Fee for a stay of `minutes`, rounded to two decimals.
    pub fn compute_fee(&self, minutes: i64) -> ParkingResult<f64> {
        if minutes < MINIMUM_BILLABLE_MINUTES {
            return Err(ParkingError::ValidationError(format!(
                "billable minutes must be at least {}, got {}",
                MINIMUM_BILLABLE_MINUTES, minutes
            )));
        }
        Ok(round_currency(minutes as f64 * self.rate_per_minute))
    }
}

impl Default for BillingCalculator {
    fn default() -> Self {
        Self {
            rate_per_minute: DEFAULT_RATE_PER_MINUTE,
        }
    }
}

pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_billable_minutes_floor_and_minimum() {
        let billing = BillingCalculator::default();

        // Under a minute still bills one
        assert_eq!(billing.billable_minutes(at(10, 0, 0), at(10, 0, 20)), 1);
        // 5m59s floors to 5
        assert_eq!(billing.billable_minutes(at(10, 0, 0), at(10, 5, 59)), 5);
        assert_eq!(
            billing.billable_minutes(at(10, 0, 0), at(10, 0, 0) + Duration::hours(2)),
            120
        );
        // Clock skew backwards
        assert_eq!(billing.billable_minutes(at(10, 5, 0), at(10, 0, 0)), 1);
    }

    #[test]
    fn test_compute_fee_reference_rate() {
        let billing = BillingCalculator::default();
        assert_eq!(billing.compute_fee(5).unwrap(), 5.0);
        assert_eq!(billing.compute_fee(1).unwrap(), 1.0);
    }

    #[test]
    fn test_compute_fee_rounds_to_cents() {
        let billing = BillingCalculator::new(0.333).unwrap();
        assert_eq!(billing.compute_fee(7).unwrap(), 2.33);

        let billing = BillingCalculator::new(1.125).unwrap();
        assert_eq!(billing.compute_fee(3).unwrap(), 3.38);
    }

    #[test]
    fn test_compute_fee_rejects_non_positive_minutes() {
        let billing = BillingCalculator::default();
        assert!(matches!(
            billing.compute_fee(0),
            Err(ParkingError::ValidationError(_))
        ));
        assert!(billing.compute_fee(-4).is_err());
    }

    #[test]
    fn test_rejects_bad_rate() {
        assert!(BillingCalculator::new(-1.0).is_err());
        assert!(BillingCalculator::new(f64::NAN).is_err());
        assert!(BillingCalculator::new(0.0).is_ok());
    }
}
