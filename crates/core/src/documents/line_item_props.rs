//! Property-based tests for line item persistence.

use ledgerly_shared::types::{Money, ProductId, ServiceId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::line_item::{LineItem, LineItemKind};
use crate::DomainError;

/// Unit prices from 0.00 to 9,999.99.
fn price() -> impl Strategy<Value = Money> {
    (0i64..1_000_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2)).unwrap())
}

fn kind() -> impl Strategy<Value = LineItemKind> {
    prop_oneof![
        (1i32..10_000).prop_map(|id| LineItemKind::Product(ProductId::new(id))),
        (1i32..10_000).prop_map(|id| LineItemKind::Service(ServiceId::new(id))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every line written to a row reads back unchanged.
    #[test]
    fn prop_columns_read_back(kind in kind(), quantity in 1i32..1_000, price in price()) {
        let line = LineItem::new(kind, quantity, price).unwrap();
        let cols = line.columns();
        let back = LineItem::from_columns(
            &cols.item_type,
            cols.product_id,
            cols.service_id,
            Some(cols.quantity),
            cols.price,
            cols.total,
        ).unwrap();
        prop_assert_eq!(back, line);
    }

    /// Exactly one of the two foreign keys is populated.
    #[test]
    fn prop_exactly_one_fk(kind in kind(), price in price()) {
        let cols = LineItem::new(kind, 1, price).unwrap().columns();
        prop_assert!(cols.product_id.is_some() ^ cols.service_id.is_some());
    }

    /// Rows with both ids are never accepted, whatever the item type says.
    #[test]
    fn prop_both_ids_rejected(p in 1i32..100, s in 1i32..100, product in any::<bool>(), price in price()) {
        let item_type = if product { "product" } else { "service" };
        let result = LineItem::from_columns(item_type, Some(p), Some(s), Some(1), price, price);
        prop_assert_eq!(result, Err(DomainError::AmbiguousLineItem));
    }

    /// Computed totals are price times quantity, exactly.
    #[test]
    fn prop_total_is_exact(quantity in 1i32..1_000, price in price(), kind in kind()) {
        let line = LineItem::new(kind, quantity, price).unwrap();
        prop_assert_eq!(line.total.value(), price.value() * Decimal::from(quantity));
    }
}
