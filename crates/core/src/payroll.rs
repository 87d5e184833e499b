//! Pay run arithmetic and timesheet periods.

use chrono::NaiveDate;
use ledgerly_shared::types::{Hours, Money};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Gross pay and deductions of one pay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRun {
    /// Pay before deductions.
    pub gross_pay: Money,
    /// Income tax withheld.
    pub taxes_withheld: Money,
    /// Pension, insurance and the like.
    pub other_deductions: Money,
}

impl PayRun {
    /// Gross pay less all deductions.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativeNetPay`] when deductions exceed gross
    /// pay.
    pub fn net_pay(&self) -> Result<Money, DomainError> {
        let net = self
            .gross_pay
            .checked_sub(self.taxes_withheld)?
            .checked_sub(self.other_deductions)?;
        if net.is_negative() {
            return Err(DomainError::NegativeNetPay(net));
        }
        Ok(net)
    }
}

/// A validated timesheet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetPeriod {
    start: NaiveDate,
    end: NaiveDate,
    hours: Hours,
}

impl TimesheetPeriod {
    /// Builds a period. Single-day periods are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPeriod`] if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate, hours: Hours) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end, hours })
    }

    /// First day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Hours worked.
    #[must_use]
    pub const fn hours(&self) -> Hours {
        self.hours
    }

    /// Number of calendar days covered, both ends included.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn money(value: &str) -> Money {
        Money::parse(value).unwrap()
    }

    #[rstest]
    #[case("3000.00", "612.40", "150.00", "2237.60")]
    #[case("19.99", "0", "0", "19.99")]
    #[case("100.00", "60.00", "40.00", "0.00")]
    fn test_net_pay(
        #[case] gross: &str,
        #[case] taxes: &str,
        #[case] other: &str,
        #[case] expected: &str,
    ) {
        let run = PayRun {
            gross_pay: money(gross),
            taxes_withheld: money(taxes),
            other_deductions: money(other),
        };
        assert_eq!(run.net_pay().unwrap(), money(expected));
    }

    #[test]
    fn test_net_pay_rejects_excess_deductions() {
        let run = PayRun {
            gross_pay: money("100.00"),
            taxes_withheld: money("80.00"),
            other_deductions: money("20.01"),
        };
        assert_eq!(
            run.net_pay().unwrap_err(),
            DomainError::NegativeNetPay(money("-0.01"))
        );
    }

    #[test]
    fn test_timesheet_period() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 5, 8).unwrap();
        let hours = Hours::parse("37.50").unwrap();

        let period = TimesheetPeriod::new(start, end, hours).unwrap();
        assert_eq!(period.days(), 5);
        assert_eq!(TimesheetPeriod::new(start, start, hours).unwrap().days(), 1);
        assert!(matches!(
            TimesheetPeriod::new(end, start, hours),
            Err(DomainError::InvalidPeriod { .. })
        ));
    }
}
