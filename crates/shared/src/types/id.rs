//! Typed IDs for type-safe entity references.
//!
//! Every table keys on a `SERIAL` column. Wrapping the raw `i32` prevents
//! passing a `CustomerId` where a `SupplierId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wraps a raw key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw key.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(BusinessId, "Identifier of a business (the tenant root).");
typed_id!(UserId, "Identifier of a user.");
typed_id!(CustomerId, "Identifier of a customer.");
typed_id!(SupplierId, "Identifier of a supplier.");
typed_id!(ProductId, "Identifier of a product.");
typed_id!(ServiceId, "Identifier of a service.");
typed_id!(InvoiceId, "Identifier of an invoice.");
typed_id!(BillId, "Identifier of a bill.");
typed_id!(CreditNoteId, "Identifier of a credit note (sales return).");
typed_id!(DebitNoteId, "Identifier of a debit note (purchase return).");
typed_id!(PaymentMadeId, "Identifier of an outgoing payment.");
typed_id!(PaymentReceivedId, "Identifier of an incoming payment.");
typed_id!(ExpenseReceiptId, "Identifier of an expense receipt.");
typed_id!(SalesReceiptId, "Identifier of a sales receipt.");
typed_id!(EmployeeId, "Identifier of an employee.");
typed_id!(PayrollId, "Identifier of a payroll history row.");
typed_id!(BankAccountId, "Identifier of a bank account.");
typed_id!(AccountId, "Identifier of a chart of accounts entry.");
typed_id!(LoanId, "Identifier of a loan.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_round_trips_raw_key() {
        let id = InvoiceId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(InvoiceId::from(42), id);
    }

    #[test]
    fn test_loan_id_parses_and_serializes() {
        let id = LoanId::from_str("12").unwrap();
        assert_eq!(id, LoanId::new(12));
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
    }

    #[test]
    fn test_typed_id_display_and_parse() {
        assert_eq!(BusinessId::new(7).to_string(), "7");
        assert_eq!(BusinessId::from_str("7").unwrap(), BusinessId::new(7));
        assert!(BusinessId::from_str("seven").is_err());
    }

    #[test]
    fn test_typed_id_serializes_transparently() {
        assert_eq!(serde_json::to_string(&UserId::new(3)).unwrap(), "3");
    }
}
