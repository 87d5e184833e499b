//! Domain types for Ledgerly.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! The database stores several concepts as loosely typed columns; the types
//! here are the application-side view of them.
//!
//! # Modules
//!
//! - `identity` - User roles, audit actions, password hashing
//! - `documents` - Payment status, line items, polymorphic document references
//! - `ledger` - Chart of accounts types
//! - `payroll` - Net pay and timesheet periods
//! - `settings` - Per-business JSON configuration documents
//! - `audit` - Before/after snapshots for the audit trail

#[macro_use]
mod macros;

pub mod audit;
pub mod documents;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod payroll;
pub mod settings;

pub use error::DomainError;
