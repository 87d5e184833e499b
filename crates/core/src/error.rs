//! Domain error types.

use chrono::NaiveDate;
use ledgerly_shared::types::{Money, NumericError};
use thiserror::Error;

/// Errors raised while building or reading domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A string column holds a value outside the known set.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant {
        /// Which enum was being parsed.
        kind: &'static str,
        /// The stored value.
        value: String,
    },

    /// A line item row has both or neither of product/service populated.
    #[error("Line item must reference exactly one of product or service")]
    AmbiguousLineItem,

    /// The populated id does not match `item_type`.
    #[error("Line item of type '{item_type}' has no {item_type} id")]
    LineItemTypeMismatch {
        /// The stored item type.
        item_type: String,
    },

    /// Line quantity must be positive.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    /// An amount does not fit its column.
    #[error(transparent)]
    Amount(#[from] NumericError),

    /// `reference_type` is set but `reference_id` is not.
    #[error("Reference of type '{0}' is missing its id")]
    MissingReferenceId(String),

    /// `reference_id` is set but `reference_type` is not.
    #[error("Reference id {0} has no reference type")]
    MissingReferenceType(i32),

    /// A settings document failed validation or did not deserialize.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// A date range ends before it starts.
    #[error("Period ends {end} before it starts {start}")]
    InvalidPeriod {
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
    },

    /// Deductions exceed gross pay.
    #[error("Deductions exceed gross pay, net would be {0}")]
    NegativeNetPay(Money),

    /// A row could not be captured as JSON for the audit trail.
    #[error("Cannot snapshot record: {0}")]
    Snapshot(String),
}
