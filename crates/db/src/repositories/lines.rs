//! Conversion between stored item rows and [`LineItem`].

use ledgerly_core::DomainError;
use ledgerly_core::documents::LineItem;
use ledgerly_shared::types::Money;
use rust_decimal::Decimal;

use crate::entities::{bill_items, invoice_items};

/// Rebuilds a line from the columns shared by both item tables.
pub(crate) fn restore(
    item_type: &str,
    product_id: Option<i32>,
    service_id: Option<i32>,
    quantity: Option<i32>,
    price: Decimal,
    total: Decimal,
) -> Result<LineItem, DomainError> {
    LineItem::from_columns(
        item_type,
        product_id,
        service_id,
        quantity,
        Money::new(price)?,
        Money::new(total)?,
    )
}

pub(crate) fn from_invoice_row(row: &invoice_items::Model) -> Result<LineItem, DomainError> {
    restore(
        &row.item_type,
        row.product_id,
        row.service_id,
        row.quantity,
        row.price,
        row.total,
    )
}

pub(crate) fn from_bill_row(row: &bill_items::Model) -> Result<LineItem, DomainError> {
    restore(
        &row.item_type,
        row.product_id,
        row.service_id,
        row.quantity,
        row.price,
        row.total,
    )
}
