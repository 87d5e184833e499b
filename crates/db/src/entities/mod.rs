//! `SeaORM` entities, one module per table.
//!
//! Column types mirror the initial migration exactly; see
//! [`crate::migration`] for defaults and constraint names.

#![allow(missing_docs)]

pub mod prelude;

pub mod audit_trails;
pub mod bank_accounts;
pub mod bank_reconciliations;
pub mod bank_transactions;
pub mod bill_items;
pub mod bills;
pub mod businesses;
pub mod cash_accounts;
pub mod chart_of_accounts;
pub mod credit_notes;
pub mod customers;
pub mod debit_notes;
pub mod documents;
pub mod employees;
pub mod expense_receipts;
pub mod fixed_assets;
pub mod general_ledger;
pub mod invoice_items;
pub mod invoices;
pub mod loans;
pub mod payments_made;
pub mod payments_received;
pub mod payroll_history;
pub mod products;
pub mod sales_receipts;
pub mod services;
pub mod settings;
pub mod suppliers;
pub mod tax_records;
pub mod timesheets;
pub mod user_activity_logs;
pub mod users;
