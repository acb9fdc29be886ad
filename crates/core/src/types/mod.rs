//! Core types for Valoisa.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::*;
pub use price::{CurrencyCode, Money, PriceError, UnitPrice};
pub use quantity::Quantity;
