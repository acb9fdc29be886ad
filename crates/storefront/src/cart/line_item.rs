//! Cart line items and their stored form.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use valoisa_core::{ProductId, Quantity, UnitPrice};

/// One product entry in the cart.
///
/// Serialized as `{"id", "name", "unitPrice", "quantity"}`; the same shape
/// is used for writing and reading the durable mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: UnitPrice,
    pub quantity: Quantity,
}

impl LineItem {
    /// Create a line item holding a single unit.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: UnitPrice) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity: Quantity::ONE,
        }
    }

    /// Replace the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.amount() * Decimal::from(self.quantity.get())
    }
}

/// Reasons a stored cart is rejected on restore.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed cart record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate line item id {0}")]
    DuplicateId(ProductId),
}

/// Serialize line items for the durable mirror.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn encode(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parse line items from the durable mirror, enforcing id uniqueness.
///
/// # Errors
///
/// Returns [`DecodeError`] if the value is not a well-formed item array.
pub fn decode(raw: &str) -> Result<Vec<LineItem>, DecodeError> {
    let items: Vec<LineItem> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.id) {
            return Err(DecodeError::DuplicateId(item.id));
        }
    }
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_shape() {
        let item = LineItem::new(ProductId::new(1), "Valputki", UnitPrice::from_cents(500));
        let json = encode(&[item]).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Valputki","unitPrice":"5.00","quantity":1}]"#
        );
    }

    #[test]
    fn test_decode_accepts_stored_shape() {
        let items =
            decode(r#"[{"id":2,"name":"Lamp","unitPrice":"12.5","quantity":4}]"#).unwrap();
        assert_eq!(items.len(), 1);
        let item = items.first().unwrap();
        assert_eq!(item.id, ProductId::new(2));
        assert_eq!(item.quantity.get(), 4);
        assert_eq!(item.line_total(), Decimal::new(50, 0));
    }

    #[test]
    fn test_decode_rejects_bad_records() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("{}"), Err(DecodeError::Malformed(_))));
        // Legacy field names are not accepted.
        assert!(decode(r#"[{"id":1,"title":"x","price":5,"qty":1}]"#).is_err());
        // Zero quantity and negative prices violate the line item invariants.
        assert!(decode(r#"[{"id":1,"name":"x","unitPrice":"5","quantity":0}]"#).is_err());
        assert!(decode(r#"[{"id":1,"name":"x","unitPrice":"-5","quantity":1}]"#).is_err());
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":1,"name":"a","unitPrice":"1","quantity":1},
            {"id":1,"name":"b","unitPrice":"2","quantity":1}
        ]"#;
        assert!(matches!(
            decode(raw),
            Err(DecodeError::DuplicateId(id)) if id == ProductId::new(1)
        ));
    }
}
