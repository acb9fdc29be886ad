//! The cart manager.
//!
//! Owns the in-memory cart. Every mutation runs to completion in one call:
//! find, update, mirror to storage, render. Storage failures are logged and
//! reported through the returned outcome but never undo the mutation.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;
use valoisa_core::{ProductId, Quantity};

use super::checkout::{CheckoutOutcome, CheckoutReceipt, CheckoutRejection, PendingCheckout};
use super::line_item::{self, LineItem};
use super::totals::DerivedTotals;
use crate::config::CartSettings;
use crate::error::StorageError;
use crate::notify::{Notification, Notifier};
use crate::storage::KeyValueStore;
use crate::view::{CartRenderer, CartView};

/// Result of a cart mutation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The cart changed and the durable mirror was updated.
    Updated,
    /// The line reached zero units and was dropped; the mirror was updated.
    Removed,
    /// No line with that id; nothing changed.
    NotFound,
    /// The cart changed in memory but the mirror write failed.
    StorageFailed,
}

impl MutationOutcome {
    /// Whether the in-memory cart changed.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Result of [`CartManager::restore`]. Anything but `Restored` leaves the
/// cart empty.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The stored cart was loaded; holds the number of lines.
    Restored(usize),
    /// Nothing was stored under the cart key.
    Missing,
    /// A value was stored but was not a valid cart.
    Corrupt,
    /// The store could not be read.
    StorageFailed,
}

/// Maintains the authoritative cart and keeps the view and the durable
/// mirror in step with it.
pub struct CartManager {
    items: Vec<LineItem>,
    shipping_waived: bool,
    settings: CartSettings,
    store: Arc<dyn KeyValueStore>,
    renderer: Arc<dyn CartRenderer>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("items", &self.items)
            .field("shipping_waived", &self.shipping_waived)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Create a manager with an empty cart.
    ///
    /// Call [`restore`](Self::restore) to load what the durable mirror holds.
    #[must_use]
    pub fn new(
        settings: CartSettings,
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn CartRenderer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            items: Vec::new(),
            shipping_waived: false,
            settings,
            store,
            renderer,
            notifier,
        }
    }

    /// Current line items, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn settings(&self) -> &CartSettings {
        &self.settings
    }

    /// Whether the shopper picks the order up in person (no shipping fee).
    #[must_use]
    pub const fn shipping_waived(&self) -> bool {
        self.shipping_waived
    }

    /// Toggle in-person pickup and redraw the totals.
    pub fn set_shipping_waived(&mut self, waived: bool) {
        self.shipping_waived = waived;
        self.render();
    }

    /// Replace the cart with whatever the durable mirror holds.
    ///
    /// Missing, unreadable or malformed data all yield an empty cart; the
    /// fault is logged, never returned as an error.
    #[instrument(skip(self), fields(key = %self.settings.storage_key))]
    pub fn restore(&mut self) -> RestoreOutcome {
        let outcome = match self.store.get(&self.settings.storage_key) {
            Ok(None) => {
                self.items = Vec::new();
                RestoreOutcome::Missing
            }
            Ok(Some(raw)) => match line_item::decode(&raw) {
                Ok(items) => {
                    let count = items.len();
                    self.items = items;
                    RestoreOutcome::Restored(count)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to restore cart, starting empty");
                    self.items = Vec::new();
                    RestoreOutcome::Corrupt
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Could not read stored cart, starting empty");
                self.items = Vec::new();
                RestoreOutcome::StorageFailed
            }
        };

        tracing::debug!(?outcome, lines = self.items.len(), "Cart restored");
        self.render();
        outcome
    }

    /// Add a product, merging into an existing line with the same id.
    ///
    /// The candidate's quantity (one unless set otherwise) is added to the
    /// existing line; otherwise the candidate is appended.
    #[instrument(skip(self, candidate), fields(id = %candidate.id, quantity = %candidate.quantity))]
    pub fn add_item(&mut self, candidate: LineItem) -> MutationOutcome {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == candidate.id) {
            existing.quantity = existing.quantity.saturating_add(candidate.quantity);
        } else {
            self.items.push(candidate);
        }

        let outcome = self.commit(MutationOutcome::Updated);
        self.notifier
            .notify(Notification::success("Success", "Item added to cart"));
        outcome
    }

    /// Add one unit to an existing line. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn increment_quantity(&mut self, id: ProductId) -> MutationOutcome {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            tracing::debug!("No line for id, ignoring increment");
            return MutationOutcome::NotFound;
        };
        item.quantity = item.quantity.saturating_add(Quantity::ONE);
        self.commit(MutationOutcome::Updated)
    }

    /// Remove one unit from a line, dropping the line when its last unit
    /// goes. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn decrement_quantity(&mut self, id: ProductId) -> MutationOutcome {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            tracing::debug!("No line for id, ignoring decrement");
            return MutationOutcome::NotFound;
        };

        let remaining = self
            .items
            .get(index)
            .and_then(|item| item.quantity.decrement());

        let outcome = match remaining {
            Some(quantity) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = quantity;
                }
                MutationOutcome::Updated
            }
            None => {
                self.items.remove(index);
                MutationOutcome::Removed
            }
        };
        self.commit(outcome)
    }

    /// Totals for the current cart. Pure; callable any number of times.
    #[must_use]
    pub fn compute_totals(&self, shipping_waived: bool) -> DerivedTotals {
        DerivedTotals::compute(&self.items, self.settings.shipping_fee, shipping_waived)
    }

    /// Totals using the current pickup setting.
    #[must_use]
    pub fn totals(&self) -> DerivedTotals {
        self.compute_totals(self.shipping_waived)
    }

    /// The view the renderer would be given right now.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::build(&self.items, &self.totals(), self.settings.currency)
    }

    /// Write the whole cart to the durable mirror.
    ///
    /// Failures are logged here as well as returned; the in-memory cart is
    /// left as it is either way.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be serialized or stored.
    pub fn persist(&self) -> Result<(), StorageError> {
        let result = line_item::encode(&self.items)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(&self.settings.storage_key, &raw));

        if let Err(e) = &result {
            tracing::warn!(
                key = %self.settings.storage_key,
                error = %e,
                "Could not persist cart"
            );
        }
        result
    }

    /// Check out the current cart.
    ///
    /// An empty cart is rejected with an error notification and nothing
    /// changes. Otherwise the cart is cleared and persisted immediately and
    /// the view reset is scheduled after the configured delay. Leaving the
    /// page before the delay elapses does not bring the cart back.
    ///
    /// Outside a tokio runtime the checkout is rejected with
    /// [`CheckoutRejection::NoRuntime`] before anything changes. A failed
    /// save of the cleared cart is reported by
    /// [`PendingCheckout::storage_failed`].
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> CheckoutOutcome {
        if self.items.is_empty() {
            self.notifier
                .notify(Notification::error("Error", "Your cart is empty"));
            return CheckoutOutcome::Rejected(CheckoutRejection::EmptyCart);
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!("Checkout requested outside a tokio runtime");
            self.notifier
                .notify(Notification::error("Error", "Checkout is unavailable"));
            return CheckoutOutcome::Rejected(CheckoutRejection::NoRuntime);
        };

        let totals = self.totals();
        let receipt = CheckoutReceipt {
            reference: Uuid::new_v4(),
            item_count: totals.item_count,
            grand_total: totals.grand_total,
            shipping_waived: self.shipping_waived,
            placed_at: Utc::now(),
        };

        self.notifier
            .notify(Notification::success("Success", "Proceeding to checkout"));

        self.items.clear();
        let persisted = self.commit(MutationOutcome::Updated) != MutationOutcome::StorageFailed;

        tracing::info!(
            reference = %receipt.reference,
            items = receipt.item_count,
            total = %receipt.grand_total,
            persisted,
            "Checkout accepted"
        );

        let renderer = Arc::clone(&self.renderer);
        let delay = self.settings.checkout_delay;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            renderer.reset_view();
        });

        CheckoutOutcome::Accepted(PendingCheckout::new(receipt, persisted, task))
    }

    /// Persist then render, mapping a persist failure onto the outcome.
    fn commit(&self, applied: MutationOutcome) -> MutationOutcome {
        let outcome = match self.persist() {
            Ok(()) => applied,
            Err(_) => MutationOutcome::StorageFailed,
        };
        self.render();
        outcome
    }

    fn render(&self) {
        self.renderer.render(&self.view());
    }
}
