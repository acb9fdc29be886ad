//! Cart view model and the rendering collaborator.
//!
//! The cart manager builds a [`CartView`] after every mutation and hands it
//! to a [`CartRenderer`]. Money is pre-formatted so renderers stay dumb.

use rust_decimal::Decimal;
use serde::Serialize;
use valoisa_core::{CurrencyCode, Money, ProductId};

use crate::cart::{DerivedTotals, LineItem};

/// Line item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u64,
    /// Whether the header count badge is visible.
    pub show_badge: bool,
    /// Whether the "your cart is empty" placeholder is shown.
    pub is_empty: bool,
}

impl CartView {
    /// Build the view for a cart and its totals.
    #[must_use]
    pub fn build(items: &[LineItem], totals: &DerivedTotals, currency: CurrencyCode) -> Self {
        let is_empty = items.is_empty();
        Self {
            items: items
                .iter()
                .map(|item| CartItemView::build(item, currency))
                .collect(),
            subtotal: format_price(totals.subtotal, currency),
            shipping: format_price(totals.shipping_fee, currency),
            total: format_price(totals.grand_total, currency),
            item_count: totals.item_count,
            show_badge: !is_empty,
            is_empty,
        }
    }
}

impl CartItemView {
    fn build(item: &LineItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity.get(),
            price: format_price(item.unit_price.amount(), currency),
            line_price: format_price(item.line_total(), currency),
        }
    }
}

fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    Money::new(amount, currency).to_string()
}

/// Draws the cart. Fire-and-forget: the manager ignores what happens next.
pub trait CartRenderer: Send + Sync {
    /// Redraw the cart contents and totals.
    fn render(&self, view: &CartView);

    /// Return the page to its browsing state once checkout has been
    /// confirmed (close the drawer, restore scrolling).
    fn reset_view(&self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use valoisa_core::{Quantity, UnitPrice};

    use super::*;

    #[test]
    fn test_build_formats_money() {
        let items = vec![
            LineItem::new(ProductId::new(1), "Valputki", UnitPrice::from_cents(500))
                .with_quantity(Quantity::new(3).unwrap()),
        ];
        let totals = DerivedTotals::compute(&items, Decimal::new(250, 2), false);
        let view = CartView::build(&items, &totals, CurrencyCode::EUR);

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items.first().map(|i| i.price.as_str()), Some("€5.00"));
        assert_eq!(view.items.first().map(|i| i.line_price.as_str()), Some("€15.00"));
        assert_eq!(view.subtotal, "€15.00");
        assert_eq!(view.shipping, "€2.50");
        assert_eq!(view.total, "€17.50");
        assert_eq!(view.item_count, 3);
        assert!(view.show_badge);
        assert!(!view.is_empty);
    }

    #[test]
    fn test_empty_cart_hides_badge() {
        let totals = DerivedTotals::compute(&[], Decimal::new(250, 2), false);
        let view = CartView::build(&[], &totals, CurrencyCode::EUR);
        assert!(view.is_empty);
        assert!(!view.show_badge);
        assert_eq!(view.subtotal, "€0.00");
    }
}
