//! Scheduled checkout completion.
//!
//! A confirmed checkout clears the cart right away; the view reset that
//! follows the confirmation toast runs later on a tokio task. The task is
//! owned by [`PendingCheckout`] and aborted when the handle is dropped.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Summary of the cart at the moment checkout was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub reference: Uuid,
    pub item_count: u64,
    pub grand_total: Decimal,
    pub shipping_waived: bool,
    pub placed_at: DateTime<Utc>,
}

/// Why a checkout request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutRejection {
    EmptyCart,
    /// No tokio runtime to schedule the completion on. The cart is untouched.
    NoRuntime,
}

/// Result of [`CartManager::checkout`](super::CartManager::checkout).
#[derive(Debug)]
pub enum CheckoutOutcome {
    Accepted(PendingCheckout),
    Rejected(CheckoutRejection),
}

impl CheckoutOutcome {
    /// Whether checkout went ahead.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// The scheduled completion was cancelled before it fired.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("checkout completion was cancelled")]
pub struct CheckoutCancelled;

/// Handle to the delayed completion of an accepted checkout.
///
/// Dropping the handle cancels the completion.
#[derive(Debug)]
pub struct PendingCheckout {
    receipt: CheckoutReceipt,
    persisted: bool,
    task: Option<JoinHandle<()>>,
}

impl PendingCheckout {
    pub(crate) fn new(receipt: CheckoutReceipt, persisted: bool, task: JoinHandle<()>) -> Self {
        Self {
            receipt,
            persisted,
            task: Some(task),
        }
    }

    /// Whether saving the cleared cart failed. When it did, the stored cart
    /// still holds the checked-out items and a reload brings them back.
    #[must_use]
    pub const fn storage_failed(&self) -> bool {
        !self.persisted
    }

    /// The receipt captured when checkout was accepted.
    #[must_use]
    pub const fn receipt(&self) -> &CheckoutReceipt {
        &self.receipt
    }

    /// Whether the scheduled completion has already run (or was aborted).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the delay to elapse and the view reset to run.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutCancelled`] if the task was aborted or panicked.
    pub async fn completed(mut self) -> Result<CheckoutReceipt, CheckoutCancelled> {
        let task = self.task.take().ok_or(CheckoutCancelled)?;
        match task.await {
            Ok(()) => Ok(self.receipt.clone()),
            Err(e) => {
                tracing::debug!(reference = %self.receipt.reference, error = %e, "Checkout completion did not run");
                Err(CheckoutCancelled)
            }
        }
    }

    /// Cancel the scheduled completion.
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PendingCheckout {
    fn drop(&mut self) {
        self.abort();
    }
}
