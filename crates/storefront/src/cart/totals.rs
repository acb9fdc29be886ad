//! Totals derived from cart contents.

use rust_decimal::Decimal;
use serde::Serialize;

use super::LineItem;

/// Values computed from the cart on demand. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTotals {
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub grand_total: Decimal,
    pub item_count: u64,
}

impl DerivedTotals {
    /// Compute totals for `items`.
    ///
    /// The flat fee is charged only when `shipping_waived` is false and only
    /// ever lands in `grand_total`.
    #[must_use]
    pub fn compute(items: &[LineItem], flat_fee: Decimal, shipping_waived: bool) -> Self {
        let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
        let item_count = items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum();
        let shipping_fee = if shipping_waived {
            Decimal::ZERO
        } else {
            flat_fee
        };

        Self {
            subtotal,
            shipping_fee,
            grand_total: subtotal + shipping_fee,
            item_count,
        }
    }
}
