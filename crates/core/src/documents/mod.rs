//! Financial document vocabulary.
//!
//! - Payment status of invoices and bills
//! - Invoice/bill line items (product or service)
//! - Polymorphic references from ledger rows and stored files to documents

pub mod line_item;
pub mod reference;
pub mod types;

#[cfg(test)]
mod line_item_props;

pub use line_item::{LineItem, LineItemColumns, LineItemKind, document_total};
pub use reference::DocumentReference;
pub use types::{ItemType, PaymentStatus};
