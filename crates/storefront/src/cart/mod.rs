//! Cart state, derived totals and checkout.

mod checkout;
pub mod line_item;
mod manager;
mod totals;

pub use checkout::{
    CheckoutCancelled, CheckoutOutcome, CheckoutReceipt, CheckoutRejection, PendingCheckout,
};
pub use line_item::{DecodeError, LineItem};
pub use manager::{CartManager, MutationOutcome, RestoreOutcome};
pub use totals::DerivedTotals;
