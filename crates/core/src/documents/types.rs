//! Status and type columns of invoices, bills and their items.

use ledgerly_shared::types::Money;
use rust_decimal::Decimal;

string_enum! {
    /// Settlement state of an invoice or bill (`payment_status`).
    PaymentStatus, "payment status" {
        /// Nothing paid yet.
        Unpaid => "unpaid",
        /// Some payments recorded, balance outstanding.
        Partial => "partial",
        /// Fully settled.
        Paid => "paid",
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

impl PaymentStatus {
    /// Reads a nullable column, where `NULL` means the column default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomainError::UnknownVariant`] for unknown text.
    pub fn from_column(value: Option<&str>) -> Result<Self, crate::DomainError> {
        value.map_or(Ok(Self::default()), Self::parse)
    }

    /// Derives the status from the amount paid against a document total.
    ///
    /// `paid` is a plain sum: it is never stored, so it may exceed what a
    /// money column holds.
    #[must_use]
    pub fn from_amounts(total: Money, paid: Decimal) -> Self {
        if paid <= Decimal::ZERO {
            Self::Unpaid
        } else if paid < total.value() {
            Self::Partial
        } else {
            Self::Paid
        }
    }

    /// Returns true once nothing is outstanding.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

string_enum! {
    /// Discriminator of an invoice or bill line (`item_type`).
    ItemType, "item type" {
        /// Line sells or buys a product.
        Product => "product",
        /// Line sells or buys a service.
        Service => "service",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_payment_status_defaults_to_unpaid() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::from_column(None).unwrap(), PaymentStatus::Unpaid);
        assert_eq!(
            PaymentStatus::from_column(Some("partial")).unwrap(),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn test_payment_status_rejects_unknown() {
        assert!(PaymentStatus::from_column(Some("overdue")).is_err());
    }

    #[rstest]
    #[case("100.00", "0.00", PaymentStatus::Unpaid)]
    #[case("100.00", "40.00", PaymentStatus::Partial)]
    #[case("100.00", "100.00", PaymentStatus::Paid)]
    #[case("100.00", "120.00", PaymentStatus::Paid)]
    #[case("100.00", "-5.00", PaymentStatus::Unpaid)]
    #[case("99999999.99", "150000000.00", PaymentStatus::Paid)]
    fn test_status_from_amounts(
        #[case] total: &str,
        #[case] paid: &str,
        #[case] expected: PaymentStatus,
    ) {
        let total = Money::parse(total).unwrap();
        let paid: Decimal = paid.parse().unwrap();
        assert_eq!(PaymentStatus::from_amounts(total, paid), expected);
    }

    #[test]
    fn test_item_type_values() {
        assert_eq!(ItemType::Product.as_str(), "product");
        assert_eq!(ItemType::parse("Service").unwrap(), ItemType::Service);
    }
}
