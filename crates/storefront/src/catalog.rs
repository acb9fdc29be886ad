//! Products offered on the landing page.

use valoisa_core::{ProductId, UnitPrice};

use crate::cart::LineItem;

/// Id of the single product the page sells.
pub const FEATURED_PRODUCT_ID: ProductId = ProductId::new(1);

/// The "add to cart" candidate for the featured product.
#[must_use]
pub fn featured_product() -> LineItem {
    LineItem::new(
        FEATURED_PRODUCT_ID,
        "Valputki LED Light Tube",
        UnitPrice::from_cents(500),
    )
}
