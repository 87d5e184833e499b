//! Invoice and bill line items.
//!
//! A line row stores `item_type` next to two nullable foreign keys, one of
//! which must be populated. [`LineItemKind`] makes the illegal shapes
//! unrepresentable; [`LineItem::from_columns`] is the only way back from a
//! row.

use ledgerly_shared::types::{Money, ProductId, ServiceId};
use serde::{Deserialize, Serialize};

use super::types::ItemType;
use crate::DomainError;

/// What a line sells or buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "item_type", content = "id", rename_all = "lowercase")]
pub enum LineItemKind {
    /// A stocked product.
    Product(ProductId),
    /// A service.
    Service(ServiceId),
}

impl LineItemKind {
    /// Returns the `item_type` discriminator.
    #[must_use]
    pub const fn item_type(&self) -> ItemType {
        match self {
            Self::Product(_) => ItemType::Product,
            Self::Service(_) => ItemType::Service,
        }
    }
}

/// A validated invoice or bill line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product or service reference.
    pub kind: LineItemKind,
    /// Units, always positive.
    pub quantity: i32,
    /// Unit price.
    pub price: Money,
    /// Line total as stored.
    pub total: Money,
}

/// The persisted shape of a line, as written to `invoice_items`/`bill_items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemColumns {
    /// `item_type`.
    pub item_type: String,
    /// `product_id`.
    pub product_id: Option<i32>,
    /// `service_id`.
    pub service_id: Option<i32>,
    /// `quantity`.
    pub quantity: i32,
    /// `price`.
    pub price: Money,
    /// `total`.
    pub total: Money,
}

/// Quantity the database assumes when the column is `NULL`.
pub const DEFAULT_QUANTITY: i32 = 1;

impl LineItem {
    /// Builds a line whose total is `price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] for a non-positive quantity
    /// and [`DomainError::Amount`] if the total overflows `NUMERIC(10, 2)`.
    pub fn new(kind: LineItemKind, quantity: i32, price: Money) -> Result<Self, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        let total = price.times(quantity)?;
        Ok(Self {
            kind,
            quantity,
            price,
            total,
        })
    }

    /// Builds a line with an explicit total (discounts, rounding agreed with
    /// the counterparty).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] for a non-positive quantity.
    pub fn with_total(
        kind: LineItemKind,
        quantity: i32,
        price: Money,
        total: Money,
    ) -> Result<Self, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        Ok(Self {
            kind,
            quantity,
            price,
            total,
        })
    }

    /// Rebuilds a line from a stored row.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnknownVariant`] if `item_type` is not product/service
    /// - [`DomainError::AmbiguousLineItem`] if both or neither id is set
    /// - [`DomainError::LineItemTypeMismatch`] if the set id disagrees with `item_type`
    /// - [`DomainError::InvalidQuantity`] for a non-positive quantity
    pub fn from_columns(
        item_type: &str,
        product_id: Option<i32>,
        service_id: Option<i32>,
        quantity: Option<i32>,
        price: Money,
        total: Money,
    ) -> Result<Self, DomainError> {
        let item_type = ItemType::parse(item_type)?;
        let kind = match (product_id, service_id) {
            (Some(id), None) => LineItemKind::Product(ProductId::new(id)),
            (None, Some(id)) => LineItemKind::Service(ServiceId::new(id)),
            _ => return Err(DomainError::AmbiguousLineItem),
        };
        if kind.item_type() != item_type {
            return Err(DomainError::LineItemTypeMismatch {
                item_type: item_type.to_string(),
            });
        }

        Self::with_total(kind, quantity.unwrap_or(DEFAULT_QUANTITY), price, total)
    }

    /// Splits the line into its column values.
    #[must_use]
    pub fn columns(&self) -> LineItemColumns {
        let (product_id, service_id) = match self.kind {
            LineItemKind::Product(id) => (Some(id.get()), None),
            LineItemKind::Service(id) => (None, Some(id.get())),
        };
        LineItemColumns {
            item_type: self.kind.item_type().to_string(),
            product_id,
            service_id,
            quantity: self.quantity,
            price: self.price,
            total: self.total,
        }
    }
}

/// Sums line totals for a document header.
///
/// # Errors
///
/// Returns [`DomainError::Amount`] if the sum overflows `NUMERIC(10, 2)`.
pub fn document_total(items: &[LineItem]) -> Result<Money, DomainError> {
    items
        .iter()
        .try_fold(Money::zero(), |acc, item| acc.checked_add(item.total))
        .map_err(DomainError::from)
}
