//! Chart of accounts and general ledger rows.
//!
//! Rows are stored as entered; balancing debits against credits is left to
//! the reporting layer.

use chrono::NaiveDate;
use ledgerly_shared::types::{AccountId, Money};
use serde::{Deserialize, Serialize};

use crate::documents::DocumentReference;

string_enum! {
    /// Classification of a chart of accounts entry (`account_type`).
    AccountType, "account type" {
        /// Resources owned.
        Asset => "asset",
        /// Amounts owed.
        Liability => "liability",
        /// Owner's stake.
        Equity => "equity",
        /// Revenue.
        Income => "income",
        /// Costs.
        Expense => "expense",
    }
}

/// Side on which an account's balance normally grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_side(&self) -> Side {
        match self {
            Self::Asset | Self::Expense => Side::Debit,
            Self::Liability | Self::Equity | Self::Income => Side::Credit,
        }
    }
}

/// One row to append to `general_ledger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPosting {
    /// Account the row belongs to.
    pub account_id: AccountId,
    /// `transaction_date`.
    pub transaction_date: NaiveDate,
    /// Free text.
    pub description: Option<String>,
    /// Debit amount, zero when the row is a credit.
    pub debit: Money,
    /// Credit amount, zero when the row is a debit.
    pub credit: Money,
    /// Source document, if any.
    pub reference: Option<DocumentReference>,
}

impl LedgerPosting {
    /// A debit row.
    #[must_use]
    pub fn debit(account_id: AccountId, transaction_date: NaiveDate, amount: Money) -> Self {
        Self {
            account_id,
            transaction_date,
            description: None,
            debit: amount,
            credit: Money::zero(),
            reference: None,
        }
    }

    /// A credit row.
    #[must_use]
    pub fn credit(account_id: AccountId, transaction_date: NaiveDate, amount: Money) -> Self {
        Self {
            account_id,
            transaction_date,
            description: None,
            debit: Money::zero(),
            credit: amount,
            reference: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches the source document.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<DocumentReference>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
