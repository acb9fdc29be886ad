//! Cart commands.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATA_DIR` - Where the cart file lives (default: .valoisa)
//! - `STOREFRONT_CART_KEY` - Storage key, also the file name stem

use std::io::Write;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use valoisa_core::{Money, ProductId, Quantity};
use valoisa_storefront::cart::{CheckoutCancelled, CheckoutRejection};
use valoisa_storefront::catalog::featured_product;
use valoisa_storefront::config::ConfigError;
use valoisa_storefront::notify::TracingNotifier;
use valoisa_storefront::storage::{FileStore, KeyValueStore};
use valoisa_storefront::view::{CartRenderer, CartView};
use valoisa_storefront::{
    CartManager, CheckoutOutcome, MutationOutcome, StorageError, StorefrontConfig,
};

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The data directory could not be opened or wiped.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Quantity must be at least one.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// Checkout was turned down.
    #[error("Checkout rejected: your cart is empty")]
    EmptyCart,

    /// Checkout could not schedule its completion.
    #[error("Checkout rejected: no async runtime available")]
    NoRuntime,

    /// Checkout completion did not run.
    #[error(transparent)]
    Cancelled(#[from] CheckoutCancelled),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// JSON output could not be produced.
    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keeps the most recent view so it is printed once per command.
#[derive(Default)]
struct LatestView {
    view: Mutex<Option<CartView>>,
}

impl LatestView {
    fn take(&self) -> Option<CartView> {
        self.view.lock().ok().and_then(|mut view| view.take())
    }
}

impl CartRenderer for LatestView {
    fn render(&self, view: &CartView) {
        if let Ok(mut latest) = self.view.lock() {
            *latest = Some(view.clone());
        }
    }

    fn reset_view(&self) {
        tracing::info!("Checkout confirmed, returning to the shop");
    }
}

/// One page load: a restored cart plus its collaborators.
pub struct Session {
    manager: CartManager,
    store: Arc<FileStore>,
    renderer: Arc<LatestView>,
}

impl Session {
    /// Open the file store and restore the cart from it.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Storage` if the data directory cannot be created.
    pub fn open(config: &StorefrontConfig) -> Result<Self, CommandError> {
        let store = Arc::new(FileStore::open(&config.data_dir)?);
        let renderer = Arc::new(LatestView::default());
        let mut manager = CartManager::new(
            config.cart.clone(),
            store.clone(),
            renderer.clone(),
            Arc::new(TracingNotifier),
        );

        let outcome = manager.restore();
        tracing::debug!(?outcome, dir = %store.dir().display(), "Opened cart");

        Ok(Self {
            manager,
            store,
            renderer,
        })
    }

    /// Print the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn show(&mut self, pickup: bool, json: bool) -> Result<(), CommandError> {
        self.manager.set_shipping_waived(pickup);
        let view = self.renderer.take().unwrap_or_else(|| self.manager.view());
        if json {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &view)?;
            writeln!(out)?;
            return Ok(());
        }
        print_view(&view)
    }

    /// Add the featured product.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ZeroQuantity` for a quantity of zero, or an
    /// error if output fails.
    pub fn add(&mut self, quantity: u32) -> Result<(), CommandError> {
        let quantity = Quantity::new(quantity).ok_or(CommandError::ZeroQuantity)?;
        let outcome = self
            .manager
            .add_item(featured_product().with_quantity(quantity));
        self.finish(outcome)
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn increment(&mut self, id: ProductId) -> Result<(), CommandError> {
        let outcome = self.manager.increment_quantity(id);
        self.finish(outcome)
    }

    /// Remove one unit from a line.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn decrement(&mut self, id: ProductId) -> Result<(), CommandError> {
        let outcome = self.manager.decrement_quantity(id);
        self.finish(outcome)
    }

    /// Check out and wait for the confirmation delay to pass.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::EmptyCart` if there is nothing to check out.
    pub async fn checkout(&mut self, pickup: bool) -> Result<(), CommandError> {
        self.manager.set_shipping_waived(pickup);
        let pending = match self.manager.checkout() {
            CheckoutOutcome::Accepted(pending) => pending,
            CheckoutOutcome::Rejected(CheckoutRejection::EmptyCart) => {
                return Err(CommandError::EmptyCart);
            }
            CheckoutOutcome::Rejected(CheckoutRejection::NoRuntime) => {
                return Err(CommandError::NoRuntime);
            }
        };
        if pending.storage_failed() {
            tracing::warn!("Checkout went ahead but the emptied cart could not be saved");
        }

        let receipt = pending.completed().await?;
        let mut out = std::io::stdout().lock();
        writeln!(
            out,
            "Order {} placed: {} item(s), total {}",
            receipt.reference,
            receipt.item_count,
            Money::new(receipt.grand_total, self.manager.settings().currency)
        )?;
        Ok(())
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Storage` if the file cannot be removed.
    pub fn reset(&mut self) -> Result<(), CommandError> {
        self.store.remove(&self.manager.settings().storage_key)?;
        tracing::info!("Stored cart removed");
        Ok(())
    }

    fn finish(&self, outcome: MutationOutcome) -> Result<(), CommandError> {
        match outcome {
            MutationOutcome::NotFound => tracing::warn!("No such line in the cart"),
            MutationOutcome::StorageFailed => {
                tracing::warn!("Cart changed but could not be saved; it will be lost on exit");
            }
            MutationOutcome::Updated | MutationOutcome::Removed => {}
        }
        let view = self.renderer.take().unwrap_or_else(|| self.manager.view());
        print_view(&view)
    }
}

fn print_view(view: &CartView) -> Result<(), CommandError> {
    let mut out = std::io::stdout().lock();

    if view.is_empty {
        writeln!(out, "Your cart is empty")?;
    } else {
        for item in &view.items {
            writeln!(
                out,
                "[{}] {} x{} @ {} = {}",
                item.id, item.name, item.quantity, item.price, item.line_price
            )?;
        }
    }

    writeln!(out, "Items:    {}", view.item_count)?;
    writeln!(out, "Subtotal: {}", view.subtotal)?;
    writeln!(out, "Shipping: {}", view.shipping)?;
    writeln!(out, "Total:    {}", view.total)?;
    Ok(())
}
