//! Fixed-precision decimal types matching `NUMERIC(p, s)` columns.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every value wraps a `rust_decimal::Decimal` that is guaranteed to fit the
//! column it is written to, so the database never rounds on our behalf.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a decimal does not fit its column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    /// More fractional digits than the column scale.
    #[error("{value} has more than {scale} decimal places")]
    TooManyDecimals {
        /// Offending value.
        value: Decimal,
        /// Column scale.
        scale: u32,
    },

    /// Too many integer digits for the column precision.
    #[error("{value} does not fit NUMERIC({precision}, {scale})")]
    Overflow {
        /// Offending value.
        value: Decimal,
        /// Column precision.
        precision: u32,
        /// Column scale.
        scale: u32,
    },

    /// Text could not be parsed as a decimal.
    #[error("invalid decimal: {0}")]
    Parse(String),
}

/// A decimal constrained to `NUMERIC(PRECISION, SCALE)`.
///
/// The stored value is always rescaled to exactly `SCALE` places, so
/// `Money::parse("5")` displays as `5.00`, like the database would return it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Numeric<const PRECISION: u32, const SCALE: u32>(Decimal);

/// Currency amount, `NUMERIC(10, 2)`.
pub type Money = Numeric<10, 2>;

/// Hours worked on a timesheet, `NUMERIC(5, 2)`.
pub type Hours = Numeric<5, 2>;

/// Interest rate in percent, `NUMERIC(5, 2)`.
pub type Rate = Numeric<5, 2>;

impl<const PRECISION: u32, const SCALE: u32> Numeric<PRECISION, SCALE> {
    /// Validates `value` against the column shape.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::TooManyDecimals`] when significant digits
    /// would be lost, and [`NumericError::Overflow`] when the integer part
    /// is too wide.
    pub fn new(value: Decimal) -> Result<Self, NumericError> {
        let normalized = value.normalize();
        if normalized.scale() > SCALE {
            return Err(NumericError::TooManyDecimals { value, scale: SCALE });
        }

        let mut scaled = normalized;
        scaled.rescale(SCALE);

        let limit = Decimal::from(10_i64.pow(PRECISION - SCALE));
        if scaled.abs() >= limit {
            return Err(NumericError::Overflow {
                value,
                precision: PRECISION,
                scale: SCALE,
            });
        }

        Ok(Self(scaled))
    }

    /// Zero at the column scale.
    #[must_use]
    pub fn zero() -> Self {
        let mut zero = Decimal::ZERO;
        zero.rescale(SCALE);
        Self(zero)
    }

    /// Parses a decimal string such as `"19.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Parse`] for malformed text, otherwise the
    /// same errors as [`Numeric::new`].
    pub fn parse(value: &str) -> Result<Self, NumericError> {
        let decimal =
            Decimal::from_str(value.trim()).map_err(|e| NumericError::Parse(e.to_string()))?;
        Self::new(decimal)
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies by a line quantity, staying inside the column.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the product does not fit.
    pub fn times(self, quantity: i32) -> Result<Self, NumericError> {
        let product = self
            .0
            .checked_mul(Decimal::from(quantity))
            .ok_or(NumericError::Overflow {
                value: self.0,
                precision: PRECISION,
                scale: SCALE,
            })?;
        Self::new(product)
    }

    /// Adds two amounts, staying inside the column.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, NumericError> {
        let sum = self.0.checked_add(other.0).ok_or(NumericError::Overflow {
            value: self.0,
            precision: PRECISION,
            scale: SCALE,
        })?;
        Self::new(sum)
    }

    /// Subtracts `other`, staying inside the column.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the difference does not fit.
    pub fn checked_sub(self, other: Self) -> Result<Self, NumericError> {
        let difference = self.0.checked_sub(other.0).ok_or(NumericError::Overflow {
            value: self.0,
            precision: PRECISION,
            scale: SCALE,
        })?;
        Self::new(difference)
    }
}

impl<const PRECISION: u32, const SCALE: u32> Default for Numeric<PRECISION, SCALE> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const PRECISION: u32, const SCALE: u32> TryFrom<Decimal> for Numeric<PRECISION, SCALE> {
    type Error = NumericError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const PRECISION: u32, const SCALE: u32> From<Numeric<PRECISION, SCALE>> for Decimal {
    fn from(value: Numeric<PRECISION, SCALE>) -> Self {
        value.0
    }
}

impl<const PRECISION: u32, const SCALE: u32> FromStr for Numeric<PRECISION, SCALE> {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<const PRECISION: u32, const SCALE: u32> fmt::Display for Numeric<PRECISION, SCALE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_keeps_exact_cents() {
        let money = Money::parse("19.99").unwrap();
        assert_eq!(money.value(), dec!(19.99));
        assert_eq!(money.to_string(), "19.99");
    }

    #[test]
    fn test_money_is_rescaled_to_two_places() {
        assert_eq!(Money::parse("5").unwrap().to_string(), "5.00");
        assert_eq!(Money::parse("0.1").unwrap().to_string(), "0.10");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        assert_eq!(Money::parse("19.9900").unwrap().value(), dec!(19.99));
    }

    #[rstest]
    #[case("19.999")]
    #[case("0.001")]
    fn test_money_rejects_extra_decimals(#[case] raw: &str) {
        assert!(matches!(
            Money::parse(raw),
            Err(NumericError::TooManyDecimals { scale: 2, .. })
        ));
    }

    #[rstest]
    #[case("99999999.99", true)]
    #[case("100000000.00", false)]
    #[case("-99999999.99", true)]
    #[case("-100000000", false)]
    fn test_money_precision_limit(#[case] raw: &str, #[case] fits: bool) {
        assert_eq!(Money::parse(raw).is_ok(), fits);
    }

    #[test]
    fn test_hours_limit() {
        assert!(Hours::parse("999.99").is_ok());
        assert!(Hours::parse("1000").is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Money::parse("abc"), Err(NumericError::Parse(_))));
    }

    #[test]
    fn test_times_quantity() {
        let price = Money::parse("19.99").unwrap();
        assert_eq!(price.times(3).unwrap().value(), dec!(59.97));
        assert!(Money::parse("50000000").unwrap().times(2).is_err());
    }

    #[test]
    fn test_negative_and_zero() {
        assert!(Money::parse("-0.01").unwrap().is_negative());
        assert!(!Money::zero().is_negative());
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_serde_uses_string_decimal() {
        let money = Money::parse("1234.50").unwrap();
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"1234.50\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
        assert!(serde_json::from_str::<Money>("\"1.234\"").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_any_cent_amount_survives_text(cents in -9_999_999_999_i64..=9_999_999_999_i64) {
            let decimal = Decimal::new(cents, 2);
            let money = Money::new(decimal).unwrap();
            let reparsed = Money::parse(&money.to_string()).unwrap();
            prop_assert_eq!(reparsed.value(), decimal);
        }
    }
}
