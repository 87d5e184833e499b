//! Polymorphic document references.
//!
//! `general_ledger` and `documents` point at "some document" through a
//! `(reference_type, reference_id)` pair with no foreign key. The pair is
//! either fully present or fully absent.

use std::fmt;

use ledgerly_shared::types::{
    BillId, CreditNoteId, DebitNoteId, ExpenseReceiptId, InvoiceId, PaymentMadeId,
    PaymentReceivedId, PayrollId, SalesReceiptId,
};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A typed pointer to a business document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentReference {
    /// `invoices.id`.
    Invoice {
        /// Referenced row.
        id: InvoiceId,
    },
    /// `bills.id`.
    Bill {
        /// Referenced row.
        id: BillId,
    },
    /// `credit_notes.id`.
    CreditNote {
        /// Referenced row.
        id: CreditNoteId,
    },
    /// `debit_notes.id`.
    DebitNote {
        /// Referenced row.
        id: DebitNoteId,
    },
    /// `payments_made.id`.
    PaymentMade {
        /// Referenced row.
        id: PaymentMadeId,
    },
    /// `payments_received.id`.
    PaymentReceived {
        /// Referenced row.
        id: PaymentReceivedId,
    },
    /// `expense_receipts.id`.
    ExpenseReceipt {
        /// Referenced row.
        id: ExpenseReceiptId,
    },
    /// `sales_receipts.id`.
    SalesReceipt {
        /// Referenced row.
        id: SalesReceiptId,
    },
    /// `payroll_history.id`.
    Payroll {
        /// Referenced row.
        id: PayrollId,
    },
    /// Anything else; the kind is stored verbatim.
    Other {
        /// Free-form `reference_type`.
        kind: String,
        /// Raw `reference_id`.
        id: i32,
    },
}

impl DocumentReference {
    /// Value written to `reference_type`.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Invoice { .. } => "invoice",
            Self::Bill { .. } => "bill",
            Self::CreditNote { .. } => "credit_note",
            Self::DebitNote { .. } => "debit_note",
            Self::PaymentMade { .. } => "payment_made",
            Self::PaymentReceived { .. } => "payment_received",
            Self::ExpenseReceipt { .. } => "expense_receipt",
            Self::SalesReceipt { .. } => "sales_receipt",
            Self::Payroll { .. } => "payroll",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Value written to `reference_id`.
    #[must_use]
    pub fn id(&self) -> i32 {
        match self {
            Self::Invoice { id } => id.get(),
            Self::Bill { id } => id.get(),
            Self::CreditNote { id } => id.get(),
            Self::DebitNote { id } => id.get(),
            Self::PaymentMade { id } => id.get(),
            Self::PaymentReceived { id } => id.get(),
            Self::ExpenseReceipt { id } => id.get(),
            Self::SalesReceipt { id } => id.get(),
            Self::Payroll { id } => id.get(),
            Self::Other { id, .. } => *id,
        }
    }

    /// Splits into `(reference_type, reference_id)`.
    #[must_use]
    pub fn columns(&self) -> (String, i32) {
        (self.kind().to_string(), self.id())
    }

    /// Builds a reference from its kind and id.
    ///
    /// Known kinds are matched case-insensitively; anything else becomes
    /// [`DocumentReference::Other`].
    #[must_use]
    pub fn new(kind: &str, id: i32) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "invoice" => Self::Invoice { id: id.into() },
            "bill" => Self::Bill { id: id.into() },
            "credit_note" => Self::CreditNote { id: id.into() },
            "debit_note" => Self::DebitNote { id: id.into() },
            "payment_made" => Self::PaymentMade { id: id.into() },
            "payment_received" => Self::PaymentReceived { id: id.into() },
            "expense_receipt" => Self::ExpenseReceipt { id: id.into() },
            "sales_receipt" => Self::SalesReceipt { id: id.into() },
            "payroll" => Self::Payroll { id: id.into() },
            _ => Self::Other {
                kind: kind.to_string(),
                id,
            },
        }
    }

    /// Reads the nullable column pair.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingReferenceId`] or
    /// [`DomainError::MissingReferenceType`] when only half the pair is set.
    pub fn from_columns(
        reference_type: Option<&str>,
        reference_id: Option<i32>,
    ) -> Result<Option<Self>, DomainError> {
        match (reference_type, reference_id) {
            (None, None) => Ok(None),
            (Some(kind), Some(id)) => Ok(Some(Self::new(kind, id))),
            (Some(kind), None) => Err(DomainError::MissingReferenceId(kind.to_string())),
            (None, Some(id)) => Err(DomainError::MissingReferenceType(id)),
        }
    }
}

impl From<InvoiceId> for DocumentReference {
    fn from(id: InvoiceId) -> Self {
        Self::Invoice { id }
    }
}

impl From<BillId> for DocumentReference {
    fn from(id: BillId) -> Self {
        Self::Bill { id }
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DocumentReference::Invoice { id: InvoiceId::new(1) }, "invoice")]
    #[case(DocumentReference::Bill { id: BillId::new(2) }, "bill")]
    #[case(DocumentReference::CreditNote { id: CreditNoteId::new(3) }, "credit_note")]
    #[case(DocumentReference::Payroll { id: PayrollId::new(4) }, "payroll")]
    fn test_known_kinds_round_trip(#[case] reference: DocumentReference, #[case] kind: &str) {
        let (stored_kind, stored_id) = reference.columns();
        assert_eq!(stored_kind, kind);
        let back = DocumentReference::from_columns(Some(&stored_kind), Some(stored_id)).unwrap();
        assert_eq!(back, Some(reference));
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let reference = DocumentReference::from_columns(Some("Quote"), Some(9)).unwrap().unwrap();
        assert_eq!(
            reference,
            DocumentReference::Other {
                kind: "Quote".to_string(),
                id: 9
            }
        );
        assert_eq!(reference.to_string(), "Quote#9");
    }

    #[test]
    fn test_known_kind_is_case_insensitive() {
        let reference = DocumentReference::new("INVOICE", 5);
        assert_eq!(reference, DocumentReference::from(InvoiceId::new(5)));
    }

    #[test]
    fn test_absent_pair_is_none() {
        assert_eq!(DocumentReference::from_columns(None, None).unwrap(), None);
    }

    #[test]
    fn test_half_pair_rejected() {
        assert_eq!(
            DocumentReference::from_columns(Some("bill"), None),
            Err(DomainError::MissingReferenceId("bill".to_string()))
        );
        assert_eq!(
            DocumentReference::from_columns(None, Some(3)),
            Err(DomainError::MissingReferenceType(3))
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(DocumentReference::from(BillId::new(8))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bill", "id": 8}));
    }
}
